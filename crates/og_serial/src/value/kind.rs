use core::fmt;

/// The dynamic type of a [`Value`](crate::value::Value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Number,
    String,
    Function,
    List,
    Object,
}

impl ValueKind {
    /// Returns `true` for kinds that are passed by value.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::Function | Self::List | Self::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Function => "function",
            Self::List => "list",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}
