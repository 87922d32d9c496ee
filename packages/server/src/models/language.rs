use common::{LANGUAGES, Language};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageResponse {
    #[schema(example = "python")]
    pub slug: String,
    #[schema(example = "Python (3.8.1)")]
    pub name: String,
    #[schema(example = 71)]
    pub judge_id: i32,
}

impl From<&Language> for LanguageResponse {
    fn from(lang: &Language) -> Self {
        Self {
            slug: lang.slug.to_string(),
            name: lang.name.to_string(),
            judge_id: lang.judge_id,
        }
    }
}

pub fn all_languages() -> Vec<LanguageResponse> {
    LANGUAGES.iter().map(Into::into).collect()
}
