//! Host type signatures
//!
//! Methods and fields are resolved by name and type signature, using the JVM
//! descriptor grammar: `(<argument types>)<return type>`.

/// `int`
pub const INT: &str = "I";
/// `long`
pub const LONG: &str = "J";
/// `double`
pub const DOUBLE: &str = "D";
/// `boolean`
pub const BOOLEAN: &str = "Z";
/// `void`
pub const VOID: &str = "V";
/// `java.lang.String`
pub const STRING: &str = "Ljava/lang/String;";
/// `java.lang.Object`
pub const OBJECT: &str = "Ljava/lang/Object;";
/// `java.util.List`
pub const LIST: &str = "Ljava/util/List;";
/// `java.util.Iterator`
pub const ITERATOR: &str = "Ljava/util/Iterator;";

/// Return category of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    /// `V`
    Void,
    /// `Z`
    Boolean,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `D`
    Double,
    /// `L...;` or `[...`
    Object,
}

impl ReturnKind {
    /// Parse the return category of a method signature.
    ///
    /// Returns `None` for malformed signatures and for return types the
    /// bridge does not marshal (byte, char, short, float).
    pub fn of(signature: &str) -> Option<Self> {
        let (_, ret) = signature.rsplit_once(')')?;
        match ret.as_bytes().first()? {
            b'V' => Some(ReturnKind::Void),
            b'Z' => Some(ReturnKind::Boolean),
            b'I' => Some(ReturnKind::Int),
            b'J' => Some(ReturnKind::Long),
            b'D' => Some(ReturnKind::Double),
            b'L' | b'[' => Some(ReturnKind::Object),
            _ => None,
        }
    }

    /// Category name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            ReturnKind::Void => "void",
            ReturnKind::Boolean => "boolean",
            ReturnKind::Int => "int",
            ReturnKind::Long => "long",
            ReturnKind::Double => "double",
            ReturnKind::Object => "object",
        }
    }
}

/// Type signature of instances of `class_path` (e.g. `a/b/C` → `La/b/C;`)
pub fn object_type(class_path: &str) -> String {
    format!("L{class_path};")
}
