use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnsupportedFormat;

/// Declared syntax of a document handed to the comparison engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// JSON text (RFC 8259).
    Json,
    /// XML 1.0 text.
    Xml,
}

const XML_EXTENSIONS: &[&str] = &["xml", "xsd", "xsl", "xslt", "svg", "xhtml"];

impl Format {
    /// Guesses the format from a file extension.
    ///
    /// Returns `None` when the extension is missing or not recognised, so the
    /// caller decides the fallback.
    ///
    /// ```
    /// # use docdiff_core::Format;
    /// assert_eq!(Format::from_path("pom.xml"), Some(Format::Xml));
    /// assert_eq!(Format::from_path("package.JSON"), Some(Format::Json));
    /// assert_eq!(Format::from_path("notes.txt"), None);
    /// ```
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        if extension == "json" {
            Some(Self::Json)
        } else if XML_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Xml)
        } else {
            None
        }
    }

    /// Lowercase name used on the wire and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl FromStr for Format {
    type Err = UnsupportedFormat;

    /// Parses `json` or `xml`, ignoring ASCII case and surrounding whitespace.
    ///
    /// ```
    /// # use docdiff_core::Format;
    /// assert_eq!("XML".parse::<Format>().unwrap(), Format::Xml);
    /// assert!("yaml".parse::<Format>().is_err());
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(UnsupportedFormat { found: value.to_string() }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_the_input() {
        let err = "toml".parse::<Format>().unwrap_err();
        assert_eq!(err.found, "toml");
        assert_eq!(err.to_string(), "unsupported format \"toml\" (expected json or xml)");
    }

    #[test]
    fn from_path_recognises_xml_family() {
        for name in ["a.xsd", "b.XSLT", "c.svg", "dir/d.xhtml"] {
            assert_eq!(Format::from_path(name), Some(Format::Xml), "{name}");
        }
        assert_eq!(Format::from_path("no_extension"), None);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Format::Xml).unwrap(), "\"xml\"");
        let parsed: Format = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(parsed, Format::Json);
    }
}
