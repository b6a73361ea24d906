//! # XML-RPC Codec
//!
//! Encodes method calls and decodes method responses. Only the subset of
//! XML that XML-RPC uses is understood: elements, text, character
//! references and the five predefined entities.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Result, UbError};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    DateTime(String),
    Base64(Vec<u8>),
    Array(Vec<Value>),
    Struct(Vec<(String, Value)>),
    Nil,
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    /// Build a struct from `(name, value)` pairs.
    pub fn structure<I, K>(members: I) -> Value
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn member(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Integer view. Servers often send ids as strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Text view. Numbers are rendered, other kinds read as empty.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) | Value::DateTime(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Double(d) => d.to_string(),
            Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
            _ => String::new(),
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Text of a struct member, empty when missing.
    pub fn text_of(&self, name: &str) -> String {
        self.member(name).map(Value::to_text).unwrap_or_default()
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let Some(end) = after.find(';') else {
            out.push_str(after);
            return out;
        };
        let entity = &after[1..end];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&after[..=end]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(i) => out.push_str(&format!("<int>{i}</int>")),
        Value::Bool(b) => out.push_str(&format!("<boolean>{}</boolean>", u8::from(*b))),
        Value::String(s) => out.push_str(&format!("<string>{}</string>", escape(s))),
        Value::Double(d) => out.push_str(&format!("<double>{d}</double>")),
        Value::DateTime(s) => {
            out.push_str(&format!("<dateTime.iso8601>{}</dateTime.iso8601>", escape(s)))
        }
        Value::Base64(bytes) => {
            out.push_str(&format!("<base64>{}</base64>", STANDARD.encode(bytes)))
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str(&format!("<member><name>{}</name>", escape(name)));
                write_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

/// Serialize a `methodCall` document.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        write_value(&mut out, param);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn malformed(message: impl Into<String>) -> UbError {
    UbError::MalformedResponse(message.into())
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_misc(&mut self) {
        loop {
            let trimmed = self.rest().trim_start();
            self.pos = self.src.len() - trimmed.len();
            let (open, close) = if trimmed.starts_with("<?") {
                ("<?", "?>")
            } else if trimmed.starts_with("<!--") {
                ("<!--", "-->")
            } else {
                return;
            };
            match trimmed[open.len()..].find(close) {
                Some(i) => self.pos += open.len() + i + close.len(),
                None => self.pos = self.src.len(),
            }
        }
    }

    fn peek_start(&mut self) -> Option<String> {
        self.skip_misc();
        let rest = self.rest();
        if !rest.starts_with('<') || rest.starts_with("</") {
            return None;
        }
        let end = rest[1..].find(|c: char| c == '>' || c == '/' || c.is_whitespace())?;
        Some(rest[1..end + 1].to_string())
    }

    fn context(&self) -> String {
        self.rest().chars().take(40).collect()
    }

    /// Consume `<name>` and return true, or `<name/>` and return false.
    fn open(&mut self, name: &str) -> Result<bool> {
        match self.peek_start() {
            Some(tag) if tag == name => {}
            _ => return Err(malformed(format!("expected <{name}> at '{}'", self.context()))),
        }
        let rest = self.rest();
        let end = rest
            .find('>')
            .ok_or_else(|| malformed(format!("unterminated <{name}>")))?;
        let empty = rest[..end].ends_with('/');
        self.pos += end + 1;
        Ok(!empty)
    }

    fn at_close(&mut self, name: &str) -> bool {
        self.skip_misc();
        self.rest().starts_with(&format!("</{name}"))
    }

    fn close(&mut self, name: &str) -> Result<()> {
        if !self.at_close(name) {
            return Err(malformed(format!("expected </{name}> at '{}'", self.context())));
        }
        let end = self
            .rest()
            .find('>')
            .ok_or_else(|| malformed(format!("unterminated </{name}>")))?;
        self.pos += end + 1;
        Ok(())
    }

    fn text(&mut self) -> String {
        let rest = self.rest();
        let end = rest.find('<').unwrap_or(rest.len());
        self.pos += end;
        unescape(&rest[..end])
    }

    fn scalar(&mut self, name: &str) -> Result<String> {
        if !self.open(name)? {
            return Ok(String::new());
        }
        let text = self.text();
        self.close(name)?;
        Ok(text)
    }

    fn value(&mut self) -> Result<Value> {
        if !self.open("value")? {
            return Ok(Value::String(String::new()));
        }
        let raw = self.text();
        if self.rest().starts_with("</value") {
            self.close("value")?;
            return Ok(Value::String(raw));
        }
        let tag = self
            .peek_start()
            .ok_or_else(|| malformed(format!("bad value at '{}'", self.context())))?;
        let value = match tag.as_str() {
            "string" => Value::String(self.scalar("string")?),
            "i4" | "i8" | "int" => {
                let text = self.scalar(&tag)?;
                Value::Int(
                    text.trim()
                        .parse()
                        .map_err(|_| malformed(format!("bad integer '{text}'")))?,
                )
            }
            "boolean" => Value::Bool(self.scalar("boolean")?.trim() == "1"),
            "double" => {
                let text = self.scalar("double")?;
                Value::Double(
                    text.trim()
                        .parse()
                        .map_err(|_| malformed(format!("bad double '{text}'")))?,
                )
            }
            "dateTime.iso8601" => Value::DateTime(self.scalar(&tag)?.trim().to_string()),
            "base64" => {
                let text: String = self.scalar("base64")?.split_whitespace().collect();
                Value::Base64(
                    STANDARD
                        .decode(text)
                        .map_err(|e| malformed(format!("bad base64: {e}")))?,
                )
            }
            "nil" => {
                self.scalar("nil")?;
                Value::Nil
            }
            "array" => self.array()?,
            "struct" => self.structure()?,
            other => return Err(malformed(format!("unknown value type <{other}>"))),
        };
        self.close("value")?;
        Ok(value)
    }

    fn array(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        if self.open("array")? {
            if self.open("data")? {
                while !self.at_close("data") {
                    items.push(self.value()?);
                }
                self.close("data")?;
            }
            self.close("array")?;
        }
        Ok(Value::Array(items))
    }

    fn structure(&mut self) -> Result<Value> {
        let mut members = Vec::new();
        if self.open("struct")? {
            while !self.at_close("struct") {
                self.open("member")?;
                let name = self.scalar("name")?;
                let value = self.value()?;
                self.close("member")?;
                members.push((name, value));
            }
            self.close("struct")?;
        }
        Ok(Value::Struct(members))
    }
}

/// Parse a `methodResponse` document. Faults become [`UbError::Fault`].
pub fn decode_response(body: &str) -> Result<Value> {
    let mut reader = Reader::new(body);
    reader.open("methodResponse")?;
    match reader.peek_start().as_deref() {
        Some("params") => {
            reader.open("params")?;
            reader.open("param")?;
            let value = reader.value()?;
            reader.close("param")?;
            reader.close("params")?;
            Ok(value)
        }
        Some("fault") => {
            reader.open("fault")?;
            let fault = reader.value()?;
            Err(UbError::Fault {
                code: fault.member("faultCode").and_then(Value::as_i64).unwrap_or(0),
                message: fault.text_of("faultString"),
            })
        }
        _ => Err(malformed(format!(
            "expected <params> or <fault> at '{}'",
            reader.context()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_call_should_escape_strings() {
        let xml = encode_call(
            "metaWeblog.newPost",
            &[Value::str(""), Value::str("a<b & c"), Value::Bool(true)],
        );
        assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
        assert!(xml.contains("<methodName>metaWeblog.newPost</methodName>"));
        assert!(xml.contains("<value><string>a&lt;b &amp; c</string></value>"));
        assert!(xml.contains("<value><boolean>1</boolean></value>"));
    }

    #[test]
    fn encode_call_should_nest_structs_and_arrays() {
        let post = Value::structure([
            ("title", Value::str("Hello")),
            (
                "categories",
                Value::Array(vec![Value::str("rust"), Value::str("vim")]),
            ),
        ]);
        let xml = encode_call("m", &[post]);
        assert!(xml.contains(
            "<struct><member><name>title</name><value><string>Hello</string></value></member>"
        ));
        assert!(xml.contains(
            "<array><data><value><string>rust</string></value><value><string>vim</string></value></data></array>"
        ));
    }

    #[test]
    fn decode_response_should_read_untyped_value_as_string() {
        let body = r#"<?xml version="1.0"?>
<methodResponse>
  <params>
    <param><value>42</value></param>
  </params>
</methodResponse>"#;
        let value = decode_response(body).unwrap();
        assert_eq!(value, Value::str("42"));
        assert_eq!(value.as_i64(), Some(42));
    }

    #[test]
    fn decode_response_should_read_struct_array() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<methodResponse><params><param><value><array><data>
  <value><struct>
    <member><name>postid</name><value><string>7</string></value></member>
    <member><name>title</name><value><string>Fish &amp; Chips</string></value></member>
    <member><name>post_status</name><value><string>publish</string></value></member>
  </struct></value>
  <value><struct>
    <member><name>page_id</name><value><i4>9</i4></value></member>
    <member><name>flag</name><value><boolean>0</boolean></value></member>
  </struct></value>
</data></array></value></param></params></methodResponse>"#;
        let value = decode_response(body).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].member("postid").and_then(Value::as_i64), Some(7));
        assert_eq!(items[0].text_of("title"), "Fish & Chips");
        assert_eq!(items[1].member("page_id"), Some(&Value::Int(9)));
        assert_eq!(items[1].member("flag").and_then(Value::as_bool), Some(false));
    }

    #[test]
    fn decode_response_should_turn_fault_into_error() {
        let body = r#"<?xml version="1.0"?>
<methodResponse><fault><value><struct>
  <member><name>faultCode</name><value><int>403</int></value></member>
  <member><name>faultString</name><value><string>Incorrect username or password.</string></value></member>
</struct></value></fault></methodResponse>"#;
        match decode_response(body) {
            Err(UbError::Fault { code, message }) => {
                assert_eq!(code, 403);
                assert_eq!(message, "Incorrect username or password.");
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn decode_response_should_read_base64_and_empty_values() {
        let body = "<methodResponse><params><param><value><struct>\
            <member><name>bits</name><value><base64>aGk=</base64></value></member>\
            <member><name>empty</name><value/></member>\
            <member><name>none</name><value><nil/></value></member>\
            </struct></value></param></params></methodResponse>";
        let value = decode_response(body).unwrap();
        assert_eq!(value.member("bits"), Some(&Value::Base64(b"hi".to_vec())));
        assert_eq!(value.member("empty"), Some(&Value::str("")));
        assert_eq!(value.member("none"), Some(&Value::Nil));
    }

    #[test]
    fn decode_response_should_reject_garbage() {
        assert!(matches!(
            decode_response("<html>oops</html>"),
            Err(UbError::MalformedResponse(_))
        ));
    }

    #[test]
    fn unescape_should_decode_character_references() {
        assert_eq!(unescape("&#65;&#x42;&lt;&unknown;"), "AB<&unknown;");
        assert_eq!(unescape("a & b"), "a & b");
    }
}
