//! # Domain Enumerations
//!
//! Item types, scopes, statuses, syntaxes and view names. All string forms
//! are validated here so the rest of the crate only sees typed values.

use std::fmt;
use std::str::FromStr;

use crate::error::UbError;

/// The three kinds of entity managed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Post,
    Page,
    Template,
}

impl ItemType {
    /// Short form used in view names and commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Post => "post",
            ItemType::Page => "page",
            ItemType::Template => "tmpl",
        }
    }

    /// Word used in prompts and messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemType::Post => "post",
            ItemType::Page => "page",
            ItemType::Template => "template",
        }
    }
}

impl FromStr for ItemType {
    type Err = UbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(ItemType::Post),
            "page" => Ok(ItemType::Page),
            "tmpl" | "template" => Ok(ItemType::Template),
            other => Err(UbError::InvalidItemType(other.to_string())),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an operation concerns the local cache or the remote blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Local,
    Remote,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Remote => "remote",
        }
    }
}

impl FromStr for Scope {
    type Err = UbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Scope::Local),
            "remote" => Ok(Scope::Remote),
            other => Err(UbError::InvalidScope(other.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publishing status of a post or page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Publish,
    Private,
    Pending,
    Draft,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Publish,
        Status::Private,
        Status::Pending,
        Status::Draft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Publish => "publish",
            Status::Private => "private",
            Status::Pending => "pending",
            Status::Draft => "draft",
        }
    }

    /// Only `publish` asks the server to make the item public.
    pub fn is_publish(&self) -> bool {
        matches!(self, Status::Publish)
    }
}

impl FromStr for Status {
    type Err = UbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UbError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status words cannot be used as template names.
pub fn check_reserved_word(word: &str) -> Result<(), UbError> {
    match word.parse::<Status>() {
        Ok(_) => Err(UbError::ReservedWord(word.to_string())),
        Err(_) => Ok(()),
    }
}

/// Markup syntaxes the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Markdown,
    Html,
    Rst,
    Textile,
    Latex,
}

impl Syntax {
    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::Markdown => "markdown",
            Syntax::Html => "html",
            Syntax::Rst => "rst",
            Syntax::Textile => "textile",
            Syntax::Latex => "latex",
        }
    }
}

impl FromStr for Syntax {
    type Err = UbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(Syntax::Markdown),
            "html" => Ok(Syntax::Html),
            "rst" | "restructuredtext" => Ok(Syntax::Rst),
            "textile" => Ok(Syntax::Textile),
            "latex" => Ok(Syntax::Latex),
            other => Err(UbError::InvalidSyntax(other.to_string())),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name a buffer carries when it acts as a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewName {
    LocalPostList,
    RemotePostList,
    LocalPageList,
    RemotePageList,
    LocalTmplList,
    SearchResultList,
    PostEdit,
    PageEdit,
    TmplEdit,
}

impl ViewName {
    pub const ALL: [ViewName; 9] = [
        ViewName::LocalPostList,
        ViewName::RemotePostList,
        ViewName::LocalPageList,
        ViewName::RemotePageList,
        ViewName::LocalTmplList,
        ViewName::SearchResultList,
        ViewName::PostEdit,
        ViewName::PageEdit,
        ViewName::TmplEdit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewName::LocalPostList => "local_post_list",
            ViewName::RemotePostList => "remote_post_list",
            ViewName::LocalPageList => "local_page_list",
            ViewName::RemotePageList => "remote_page_list",
            ViewName::LocalTmplList => "local_tmpl_list",
            ViewName::SearchResultList => "search_result_list",
            ViewName::PostEdit => "post_edit",
            ViewName::PageEdit => "page_edit",
            ViewName::TmplEdit => "tmpl_edit",
        }
    }

    /// List view for the given scope and item type.
    pub fn list_of(scope: Scope, item_type: ItemType) -> ViewName {
        match (scope, item_type) {
            (_, ItemType::Template) => ViewName::LocalTmplList,
            (Scope::Local, ItemType::Post) => ViewName::LocalPostList,
            (Scope::Local, ItemType::Page) => ViewName::LocalPageList,
            (Scope::Remote, ItemType::Post) => ViewName::RemotePostList,
            (Scope::Remote, ItemType::Page) => ViewName::RemotePageList,
        }
    }

    /// Edit view for the given item type.
    pub fn edit_of(item_type: ItemType) -> ViewName {
        match item_type {
            ItemType::Post => ViewName::PostEdit,
            ItemType::Page => ViewName::PageEdit,
            ItemType::Template => ViewName::TmplEdit,
        }
    }

    pub fn matches_suffix(&self, suffix: &str) -> bool {
        self.as_str().ends_with(suffix)
    }

    pub fn is_list(&self) -> bool {
        self.matches_suffix("list")
    }

    pub fn is_edit(&self) -> bool {
        self.matches_suffix("edit")
    }

    /// Item type shown by this view. Search results mix posts and pages.
    pub fn item_type(&self) -> Option<ItemType> {
        match self {
            ViewName::LocalPostList | ViewName::RemotePostList | ViewName::PostEdit => {
                Some(ItemType::Post)
            }
            ViewName::LocalPageList | ViewName::RemotePageList | ViewName::PageEdit => {
                Some(ItemType::Page)
            }
            ViewName::LocalTmplList | ViewName::TmplEdit => Some(ItemType::Template),
            ViewName::SearchResultList => None,
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            ViewName::RemotePostList | ViewName::RemotePageList => Scope::Remote,
            _ => Scope::Local,
        }
    }
}

impl FromStr for ViewName {
    type Err = UbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewName::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or(UbError::InvalidView)
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
