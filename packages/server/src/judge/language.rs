use serde::Serialize;

/// A language accepted by the code execution service.
#[derive(Clone, Copy, Debug, Serialize, utoipa::ToSchema)]
pub struct Language {
    /// Name clients send in requests.
    #[schema(value_type = String, example = "python")]
    pub name: &'static str,
    /// Judge0 language id.
    #[schema(example = 71)]
    pub judge_id: u32,
    #[schema(value_type = String, example = "Python (3.8.1)")]
    pub label: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language {
        name: "python",
        judge_id: 71,
        label: "Python (3.8.1)",
    },
    Language {
        name: "javascript",
        judge_id: 63,
        label: "JavaScript (Node.js 12.14.0)",
    },
    Language {
        name: "java",
        judge_id: 62,
        label: "Java (OpenJDK 13.0.1)",
    },
    Language {
        name: "cpp",
        judge_id: 54,
        label: "C++ (GCC 9.2.0)",
    },
    Language {
        name: "c",
        judge_id: 50,
        label: "C (GCC 9.2.0)",
    },
    Language {
        name: "go",
        judge_id: 60,
        label: "Go (1.13.5)",
    },
    Language {
        name: "rust",
        judge_id: 73,
        label: "Rust (1.40.0)",
    },
    Language {
        name: "typescript",
        judge_id: 74,
        label: "TypeScript (3.7.4)",
    },
    Language {
        name: "csharp",
        judge_id: 51,
        label: "C# (Mono 6.6.0.161)",
    },
];

/// Resolve a client-supplied language name (case-insensitive, common aliases allowed).
pub fn resolve_language(name: &str) -> Option<&'static Language> {
    let lowered = name.trim().to_ascii_lowercase();
    let canonical = match lowered.as_str() {
        "python3" | "py" => "python",
        "js" | "node" => "javascript",
        "c++" => "cpp",
        "ts" => "typescript",
        "c#" | "cs" => "csharp",
        other => other,
    };
    LANGUAGES.iter().find(|l| l.name == canonical)
}
