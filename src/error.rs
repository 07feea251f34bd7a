use wasm_bindgen::JsValue;

/// Failure to turn one GPX attachment into a [`GpxDocument`](crate::gpx_types::GpxDocument).
#[derive(Debug)]
pub enum ParseError {
    XmlParse(quick_xml::Error),
    MissingRoot,
    UnexpectedContent {
        position: &'static str,
    },
    UnexpectedEof {
        element: &'static str,
    },
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    InvalidNumber {
        element: &'static str,
        value: String,
    },
    InvalidTime {
        value: String,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XmlParse(e) => write!(f, "XML parse error: {e}"),
            Self::MissingRoot => write!(f, "Document has no <gpx> root element"),
            Self::UnexpectedContent { position } => {
                write!(f, "Unexpected content {position}")
            }
            Self::UnexpectedEof { element } => {
                write!(f, "Unexpected end of document inside <{element}>")
            }
            Self::MissingAttribute { element, attribute } => {
                write!(f, "Missing attribute '{attribute}' on <{element}>")
            }
            Self::InvalidAttribute {
                element,
                attribute,
                value,
            } => write!(
                f,
                "Invalid value '{value}' for attribute '{attribute}' on <{element}>"
            ),
            Self::InvalidNumber { element, value } => {
                write!(f, "Invalid number '{value}' in <{element}>")
            }
            Self::InvalidTime { value } => write!(f, "Invalid timestamp '{value}'"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::XmlParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(e: quick_xml::Error) -> Self {
        Self::XmlParse(e)
    }
}

impl From<ParseError> for JsValue {
    fn from(e: ParseError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
