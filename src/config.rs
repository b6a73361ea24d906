//! Configuration constants and profile loading for ultrablog
//!
//! Settings live in an INI profile file. Each section is a profile holding
//! the blog account and the client options:
//!
//! ```ini
//! [default]
//! login_name = admin
//! password = secret
//! url = https://blog.example.com
//! xmlrpc_uri = xmlrpc.php
//! local_pagesize = 20
//! save_after_sent = 1
//! ```

use std::path::{Path, PathBuf};

use ini::{Ini, Properties};

use crate::error::Result;

/// Default profile file path for ultrablog
pub const DEFAULT_PROFILE_PATH: &str = "~/.ultrablog/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "ULTRABLOG_PROFILE_PATH";

/// Default location of the local cache database
pub const DEFAULT_DB_PATH: &str = "~/.ultrablog/ultrablog.json";

/// Link appended to new posts when promotion is enabled
pub const HOMEPAGE: &str = "http://0x3f.org/blog/ultrablog-as-an-ultimate-vim-blogging-plugin/";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Blog account and endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogSettings {
    pub login_name: String,
    pub password: String,
    /// Blog home URL, always ending with `/`.
    pub url: String,
    /// Endpoint path relative to `url`, without a leading `/`.
    pub xmlrpc_uri: String,
    pub db_path: PathBuf,
    pub categories: String,
}

impl BlogSettings {
    /// Full XML-RPC endpoint.
    pub fn xmlrpc_url(&self) -> String {
        format!("{}{}", self.url, self.xmlrpc_uri)
    }

    fn from_section(section: &Properties) -> Option<Self> {
        let get = |key: &str| section.get(key).map(|v| v.trim().to_string());

        let url = get("url")?;
        let login_name = get("login_name")?;
        let password = get("password")?;
        let xmlrpc_uri = get("xmlrpc_uri")?;

        let url = if url.ends_with('/') { url } else { format!("{url}/") };
        let xmlrpc_uri = xmlrpc_uri
            .strip_prefix('/')
            .map(str::to_string)
            .unwrap_or(xmlrpc_uri);
        let db = get("db")
            .filter(|db| !db.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        Some(Self {
            login_name,
            password,
            url,
            xmlrpc_uri,
            db_path: PathBuf::from(shellexpand::tilde(&db).into_owned()),
            categories: get("categories").unwrap_or_default(),
        })
    }
}

/// Key bindings installed on list views.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotkeys {
    pub open_in_current_view: String,
    pub open_in_splitted_view: String,
    pub open_in_tabbed_view: String,
    pub delete_item: String,
    pub pagedown: String,
    pub pageup: String,
    pub save_current_item: String,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            open_in_current_view: "<enter>".to_string(),
            open_in_splitted_view: "<s-enter>".to_string(),
            open_in_tabbed_view: "<c-enter>".to_string(),
            delete_item: "<del>".to_string(),
            pagedown: "<c-pagedown>".to_string(),
            pageup: "<c-pageup>".to_string(),
            save_current_item: "<c-s>".to_string(),
        }
    }
}

/// Client options with their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub local_pagesize: i64,
    pub remote_pagesize: i64,
    pub search_pagesize: i64,
    pub socket_timeout: u64,
    pub save_after_sent: bool,
    pub save_after_opened: bool,
    pub append_promotion_link: bool,
    pub default_template: String,
    pub converter_command: String,
    pub converter_options: Vec<String>,
    pub converter_option_from: String,
    pub converter_option_to: String,
    pub list_col_widths: [usize; 3],
    /// `syntax###template` used to insert uploaded media links.
    pub tmpl_img_url: String,
    pub hotkeys: Hotkeys,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            local_pagesize: 30,
            remote_pagesize: 10,
            search_pagesize: 30,
            socket_timeout: 10,
            save_after_sent: false,
            save_after_opened: false,
            append_promotion_link: false,
            default_template: "default".to_string(),
            converter_command: "pandoc".to_string(),
            converter_options: vec!["--reference-links".to_string()],
            converter_option_from: "--from=%s".to_string(),
            converter_option_to: "--to=%s".to_string(),
            list_col_widths: [10, 10, 10],
            tmpl_img_url: "markdown###![%(file)s][]\n[%(file)s]:%(url)s".to_string(),
            hotkeys: Hotkeys::default(),
        }
    }
}

fn positive(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn boolean(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim) {
        Some("1") => true,
        Some("0") => false,
        _ => default,
    }
}

fn text(value: Option<&str>, default: &str) -> String {
    value
        .map(|v| v.trim().replace("\\n", "\n"))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Options {
    fn from_section(section: &Properties) -> Self {
        let defaults = Options::default();
        let hk = &defaults.hotkeys;
        let get = |key: &str| section.get(key);

        Self {
            local_pagesize: positive(get("local_pagesize"), defaults.local_pagesize),
            remote_pagesize: positive(get("remote_pagesize"), defaults.remote_pagesize),
            search_pagesize: positive(get("search_pagesize"), defaults.search_pagesize),
            socket_timeout: positive(get("socket_timeout"), 10) as u64,
            save_after_sent: boolean(get("save_after_sent"), false),
            save_after_opened: boolean(get("save_after_opened"), false),
            append_promotion_link: boolean(get("append_promotion_link"), false),
            default_template: text(get("default_template"), &defaults.default_template),
            converter_command: text(get("converter_command"), &defaults.converter_command),
            converter_options: get("converter_options")
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or(defaults.converter_options),
            converter_option_from: text(
                get("converter_option_from"),
                &defaults.converter_option_from,
            ),
            converter_option_to: text(get("converter_option_to"), &defaults.converter_option_to),
            list_col_widths: [
                positive(get("list_col1_width"), 10) as usize,
                positive(get("list_col2_width"), 10) as usize,
                positive(get("list_col3_width"), 10) as usize,
            ],
            tmpl_img_url: text(get("tmpl_img_url"), &defaults.tmpl_img_url),
            hotkeys: Hotkeys {
                open_in_current_view: text(
                    get("hotkey_open_item_in_current_view"),
                    &hk.open_in_current_view,
                ),
                open_in_splitted_view: text(
                    get("hotkey_open_item_in_splitted_view"),
                    &hk.open_in_splitted_view,
                ),
                open_in_tabbed_view: text(
                    get("hotkey_open_item_in_tabbed_view"),
                    &hk.open_in_tabbed_view,
                ),
                delete_item: text(get("hotkey_delete_item"), &hk.delete_item),
                pagedown: text(get("hotkey_pagedown"), &hk.pagedown),
                pageup: text(get("hotkey_pageup"), &hk.pageup),
                save_current_item: text(get("hotkey_save_current_item"), &hk.save_current_item),
            },
        }
    }

    /// Page size configured for a listing scope.
    pub fn pagesize_for(&self, scope: crate::models::Scope) -> i64 {
        match scope {
            crate::models::Scope::Local => self.local_pagesize,
            crate::models::Scope::Remote => self.remote_pagesize,
        }
    }
}

/// Everything read from one profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub blog: Option<BlogSettings>,
    pub options: Options,
}

impl Settings {
    /// Load a profile from the configured profile file. A missing file or
    /// section yields defaults with no blog configured.
    pub fn load(profile: &str) -> Result<Self> {
        let path = shellexpand::tilde(&get_profile_path()).into_owned();
        Self::load_from(Path::new(&path), profile)
    }

    pub fn load_from(path: &Path, profile: &str) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Profile file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        Ok(Self::from_ini(&ini, profile))
    }

    pub fn from_ini_str(content: &str, profile: &str) -> Result<Self> {
        let ini = Ini::load_from_str(content).map_err(|e| {
            crate::error::UbError::Config(format!("cannot parse profile: {e}"))
        })?;
        Ok(Self::from_ini(&ini, profile))
    }

    fn from_ini(ini: &Ini, profile: &str) -> Self {
        match ini.section(Some(profile)) {
            Some(section) => {
                let blog = BlogSettings::from_section(section);
                if blog.is_none() {
                    tracing::warn!("Profile '{profile}' has no complete blog account");
                }
                Self {
                    blog,
                    options: Options::from_section(section),
                }
            }
            None => {
                tracing::warn!("Profile '{profile}' not found");
                Self::default()
            }
        }
    }
}
