//! The closed set of languages the editor supports.

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

/// A supported editor language.
///
/// Each variant carries its file extension, display name, starter snippet,
/// and (where the backend offers one) the compile route segment as associated
/// data, so adding a language is a compile-checked change rather than a new
/// entry in a string lookup table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Language {
    C,
    #[strum(serialize = "cpp", serialize = "c++")]
    Cpp,
    Java,
    #[strum(serialize = "javascript", serialize = "js")]
    JavaScript,
    Python,
    Html,
}

impl Language {
    /// The file extension stored on remote files of this language.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::JavaScript => "js",
            Self::Python => "py",
            Self::Html => "html",
        }
    }

    /// Resolves a stored file extension back to a language.
    ///
    /// Accepts exactly the extensions [`Language::extension`] emits,
    /// case-insensitively. Returns `None` for anything else.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "c" => Some(Self::C),
            "cpp" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            "js" => Some(Self::JavaScript),
            "py" => Some(Self::Python),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    /// Human-readable name for prompts and listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::C => "C",
            Self::Cpp => "C++",
            Self::Java => "Java",
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Html => "HTML",
        }
    }

    /// The path segment of the backend compile endpoint, if this language
    /// is compilable remotely. HTML and C have no compile route.
    pub fn compile_route(&self) -> Option<&'static str> {
        match self {
            Self::Cpp => Some("cpp"),
            Self::Java => Some("java"),
            Self::Python => Some("python"),
            Self::JavaScript => Some("javascript"),
            Self::C | Self::Html => None,
        }
    }

    pub fn is_compilable(&self) -> bool {
        self.compile_route().is_some()
    }

    /// Whether the AI converter handles this language. Markup is excluded.
    pub fn is_convertible(&self) -> bool {
        !matches!(self, Self::Html)
    }

    /// The starter snippet shown in a fresh buffer for this language.
    pub fn default_snippet(&self) -> &'static str {
        match self {
            Self::C => {
                "#include <stdio.h>\n\nint main() {\n    printf(\"Hello, C!\\n\");\n    return 0;\n}"
            }
            Self::Cpp => {
                "#include <iostream>\nusing namespace std;\nint main() {\n    cout << \"Hello, C++!\" << endl;\n    return 0;\n}"
            }
            Self::Java => {
                "public class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, Java!\");\n    }\n}"
            }
            Self::JavaScript => "console.log(\"Hello, JavaScript!\");",
            Self::Python => "print(\"Hello, Python!\")",
            Self::Html => "<h2>Hello, HTML!</h2>",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
