use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One unit of work to apply against the target store. Operations sharing an
/// id are applied at most once; the id doubles as the tracking-record key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip)]
    pub id: String,
    pub method: Method,
    pub uri: String,
    #[serde(default)]
    pub body: Map<String, Value>,
    #[serde(default)]
    pub rollback: RollbackSpec,
}

/// The compensating request run when an operation is rolled back. Absent
/// unless both a method and a uri are given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollbackSpec {
    #[serde(default)]
    pub method: Option<Method>,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub body: Map<String, Value>,
}

impl RollbackSpec {
    pub fn has_spec(&self) -> bool {
        self.method.is_some() && !self.uri.is_empty()
    }
}

impl Operation {
    /// Parses a raw JSON descriptor. The id is assigned by the caller from
    /// the descriptor's filename, never from the document itself.
    pub fn from_descriptor(id: impl Into<String>, raw: &str) -> Result<Self, serde_json::Error> {
        let mut operation: Self = serde_json::from_str(raw)?;
        operation.id = id.into();
        Ok(operation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Method {
    Get,
    Put,
    Post,
    Head,
    Delete,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Put,
        Method::Post,
        Method::Head,
        Method::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "PUT" => Ok(Method::Put),
            "POST" => Ok(Method::Post),
            "HEAD" => Ok(Method::Head),
            "DELETE" => Ok(Method::Delete),
            other => Err(format!(
                "unsupported HTTP method '{other}': expected one of GET, PUT, POST, HEAD, DELETE"
            )),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = String;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        input.parse()
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}
