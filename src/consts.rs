// Global safety caps to prevent pathological or infinite loops

// Parser: global gas limit (upper bound on total parser steps across a file)
pub const PARSER_MAX_GAS: usize = 5_000_000;

// Resolve: supertype walks inside one compilation unit
pub const RESOLVE_MAX_HIERARCHY_STEPS: usize = 10_000;

// Naming: how many numbered candidates to try before giving up
pub const NAMING_MAX_CANDIDATES: usize = 100_000;

pub const DEFAULT_INDEX_NAME: &str = "i";
pub const DEFAULT_INDEX_TYPE: &str = "int";
pub const DEFAULT_INDENT_SIZE: usize = 4;

// Accessors used when the iterated value is a list rather than an array
pub const LIST_SIZE_ACCESSOR: &str = "size";
pub const LIST_ELEMENT_ACCESSOR: &str = "get";
pub const ARRAY_LENGTH_FIELD: &str = "length";

// Package of the list types below; subpackages such as `java.util.concurrent` count too
pub const LIST_PACKAGE: &str = "java.util";

// java.util types known to support size() and get(int)
pub const KNOWN_LIST_TYPES: &[&str] = &[
    "List", "ArrayList", "LinkedList", "Vector", "Stack",
    "CopyOnWriteArrayList", "AbstractList", "AbstractSequentialList",
];

// Packages whose classes may appear under their simple name without an import
pub const IMPLICIT_IMPORT_PACKAGE: &str = "java.lang";

// Reserved words that can never be used as an identifier
pub const JAVA_RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "default", "do", "double", "else", "enum",
    "extends", "final", "finally", "float", "for", "goto", "if", "implements",
    "import", "instanceof", "int", "interface", "long", "native", "new",
    "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null",
    "_",
];
