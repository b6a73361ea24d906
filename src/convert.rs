//! # Markup Conversion
//!
//! Markdown to HTML is rendered in-process. Every other pair goes through
//! the configured external converter (pandoc by default) with the content
//! piped through stdin and stdout in the command's encoding.

use std::io::Write;
use std::process::{Command, Stdio};

use encoding_rs::Encoding;
use pulldown_cmark::{html, Options as MarkdownOptions, Parser};

use crate::config::Options;
use crate::error::{Result, UbError};
use crate::models::Syntax;

#[derive(Debug, Clone, PartialEq)]
pub struct Converter {
    command: String,
    options: Vec<String>,
    option_from: String,
    option_to: String,
}

impl Default for Converter {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

impl Converter {
    pub fn from_options(options: &Options) -> Self {
        Self {
            command: options.converter_command.clone(),
            options: options.converter_options.clone(),
            option_from: options.converter_option_from.clone(),
            option_to: options.converter_option_to.clone(),
        }
    }

    pub fn convert(
        &self,
        content: &str,
        from: Syntax,
        to: Syntax,
        encoding: &'static Encoding,
    ) -> Result<String> {
        if from == to {
            return Ok(content.to_string());
        }
        if from == Syntax::Markdown && to == Syntax::Html {
            return Ok(markdown_to_html(content));
        }
        self.run_external(content, from, to, encoding)
    }

    fn arguments(&self, from: Syntax, to: Syntax) -> Vec<String> {
        let mut args = self.options.clone();
        args.push(self.option_from.replace("%s", from.as_str()));
        args.push(self.option_to.replace("%s", to.as_str()));
        args
    }

    fn run_external(
        &self,
        content: &str,
        from: Syntax,
        to: Syntax,
        encoding: &'static Encoding,
    ) -> Result<String> {
        let program = which::which(&self.command).map_err(|e| {
            UbError::Conversion(format!("converter '{}' not found: {e}", self.command))
        })?;
        let args = self.arguments(from, to);
        tracing::debug!("Converting {from} to {to} with {} {:?}", program.display(), args);

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (input, _, _) = encoding.encode(content);
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&input)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let (stderr, _, _) = encoding.decode(&output.stderr);
            return Err(UbError::Conversion(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let (text, _, _) = encoding.decode(&output.stdout);
        Ok(text.replace("\r\n", "\n"))
    }
}

fn markdown_to_html(content: &str) -> String {
    let mut options = MarkdownOptions::empty();
    options.insert(MarkdownOptions::ENABLE_TABLES);
    options.insert(MarkdownOptions::ENABLE_FOOTNOTES);
    options.insert(MarkdownOptions::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(content, options);
    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_should_return_input_for_same_syntax() {
        let converter = Converter::default();
        let text = "# title\n\nbody";
        let out = converter
            .convert(text, Syntax::Markdown, Syntax::Markdown, encoding_rs::UTF_8)
            .unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn convert_should_render_markdown_in_process() {
        let converter = Converter::default();
        let out = converter
            .convert("World", Syntax::Markdown, Syntax::Html, encoding_rs::UTF_8)
            .unwrap();
        assert_eq!(out.trim(), "<p>World</p>");
    }

    #[test]
    fn convert_should_render_reference_links() {
        let converter = Converter::default();
        let out = converter
            .convert(
                "![a.png][]\n\n[a.png]: http://x/a.png",
                Syntax::Markdown,
                Syntax::Html,
                encoding_rs::UTF_8,
            )
            .unwrap();
        assert!(out.contains(r#"src="http://x/a.png""#));
    }

    #[test]
    fn arguments_should_fill_syntax_placeholders() {
        let converter = Converter::default();
        assert_eq!(
            converter.arguments(Syntax::Html, Syntax::Rst),
            vec![
                "--reference-links".to_string(),
                "--from=html".to_string(),
                "--to=rst".to_string()
            ]
        );
    }

    #[test]
    fn convert_should_fail_when_converter_is_missing() {
        let converter = Converter {
            command: "ultrablog-no-such-converter".to_string(),
            ..Converter::default()
        };
        let err = converter
            .convert("<p>x</p>", Syntax::Html, Syntax::Markdown, encoding_rs::UTF_8)
            .unwrap_err();
        assert!(matches!(err, UbError::Conversion(_)));
    }
}
