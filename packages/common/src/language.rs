use serde::Serialize;

/// A language the judge can run, keyed by a short slug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Short identifier accepted in submission requests.
    pub slug: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Judge0 language id.
    pub judge_id: i32,
}

/// Languages exposed to clients.
pub const LANGUAGES: &[Language] = &[
    Language {
        slug: "c",
        name: "C (GCC 9.2.0)",
        judge_id: 50,
    },
    Language {
        slug: "cpp",
        name: "C++ (GCC 9.2.0)",
        judge_id: 54,
    },
    Language {
        slug: "go",
        name: "Go (1.13.5)",
        judge_id: 60,
    },
    Language {
        slug: "java",
        name: "Java (OpenJDK 13.0.1)",
        judge_id: 62,
    },
    Language {
        slug: "javascript",
        name: "JavaScript (Node.js 12.14.0)",
        judge_id: 63,
    },
    Language {
        slug: "python",
        name: "Python (3.8.1)",
        judge_id: 71,
    },
    Language {
        slug: "rust",
        name: "Rust (1.40.0)",
        judge_id: 73,
    },
    Language {
        slug: "typescript",
        name: "TypeScript (3.7.4)",
        judge_id: 74,
    },
];

impl Language {
    /// Find a language by slug (case-insensitive).
    pub fn from_slug(slug: &str) -> Option<&'static Language> {
        let slug = slug.trim();
        LANGUAGES.iter().find(|l| l.slug.eq_ignore_ascii_case(slug))
    }

    pub fn from_judge_id(id: i32) -> Option<&'static Language> {
        LANGUAGES.iter().find(|l| l.judge_id == id)
    }
}
