// API client module: contains a small blocking HTTP client that talks to
// the Fiveable library API. All endpoints are public GETs, so the client
// carries no credentials; it is intentionally small and synchronous.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Path of the catalog document that enumerates every subject. The segment
/// after `_next/data` is the site's build id and changes on redeploys.
const CATALOG_PATH: &str = "/_next/data/H6rl5wshOljn2Oaxn4Hbn/index.json";

/// Simple API client that holds a reqwest blocking client and the base URL
/// of the Fiveable library site.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Catalog response. Only the slug-bearing parts of the page payload are
/// modeled; the container keys are required so that an unexpected document
/// shape surfaces as a parse error rather than an empty subject list.
#[derive(Deserialize, Debug)]
pub struct CatalogResponse {
    #[serde(rename = "pageProps")]
    pub page_props: PageProps,
}

#[derive(Deserialize, Debug)]
pub struct PageProps {
    #[serde(rename = "subjectsByCategoryBranch")]
    pub subjects_by_category_branch: Vec<CategoryBranch>,
    pub stats: CatalogStats,
}

#[derive(Deserialize, Debug)]
pub struct CategoryBranch {
    #[serde(default)]
    pub subjects: Vec<SlugEntry>,
}

/// The two stats breakdowns carry subject slugs of their own; merging them
/// with the main list catches subjects the branch listing omits.
#[derive(Deserialize, Debug)]
pub struct CatalogStats {
    #[serde(rename = "countSubjectsByCategoryBranch")]
    pub by_branch: Vec<SlugEntry>,
    #[serde(rename = "countSubjectsByCategorySubBranch")]
    pub by_sub_branch: Vec<SlugEntry>,
}

#[derive(Deserialize, Debug)]
pub struct SlugEntry {
    #[serde(default)]
    pub slug: Option<String>,
}

/// Navigation response for one subject: units, each with its resources.
#[derive(Deserialize, Debug)]
pub struct NavigationResponse {
    #[serde(rename = "getNavigationSubject")]
    pub subject: Option<NavigationSubject>,
}

#[derive(Deserialize, Debug, Default)]
pub struct NavigationSubject {
    #[serde(default)]
    pub units: Vec<UnitEntry>,
}

#[derive(Deserialize, Debug)]
pub struct UnitEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Deserialize, Debug)]
pub struct ResourceEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "topicIds", default)]
    pub topic_ids: Vec<String>,
}

/// Practice-questions response. `answers` arrive in presentation order and
/// the entry with `type == "CORRECT"` marks the right option.
#[derive(Deserialize, Debug)]
pub struct QuestionsResponse {
    #[serde(default)]
    pub data: Option<QuestionsData>,
}

#[derive(Deserialize, Debug, Default)]
pub struct QuestionsData {
    #[serde(rename = "practiceQuestionsByTopic", default)]
    pub questions: Vec<QuestionEntry>,
}

#[derive(Deserialize, Debug)]
pub struct QuestionEntry {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answers: Vec<AnswerEntry>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct AnswerEntry {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ApiClient {
    /// Create an ApiClient configured from the environment variable
    /// `FIVEABLE_BASE_URL` or fallback to the public library site. A single
    /// 15 second timeout applies to every request.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("FIVEABLE_BASE_URL")
            .unwrap_or_else(|_| "https://library.fiveable.me".into());
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client, base_url })
    }

    /// Fetch the catalog document listing every subject slug.
    pub fn fetch_catalog(&self) -> Result<CatalogResponse> {
        let url = format!("{}{}", &self.base_url, CATALOG_PATH);
        let res = self.client.get(&url)
            .send()
            .context("Failed to send catalog request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Catalog request failed: {} - {}", status, txt);
        }
        let resp: CatalogResponse = res.json().context("Parsing catalog response json")?;
        Ok(resp)
    }

    /// Fetch the unit/topic navigation tree for one subject slug.
    pub fn fetch_navigation(&self, slug: &str) -> Result<NavigationResponse> {
        let url = format!("{}/api/subjects/{}/getAllNavigationData", &self.base_url, slug);
        let res = self.client.get(&url)
            .send()
            .with_context(|| format!("Failed to send navigation request for '{}'", slug))?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Navigation request failed: {} - {}", status, txt);
        }
        let resp: NavigationResponse = res.json().context("Parsing navigation response json")?;
        Ok(resp)
    }

    /// Fetch up to `limit` practice questions for a topic. Callers keep
    /// `limit` inside 1..=40; it is not enforced here. `question_type` is an
    /// optional server-side filter (e.g. "SINGLE_ANSWER") passed through
    /// untouched when present.
    pub fn fetch_questions(
        &self,
        subject_slug: &str,
        unit_id: &str,
        topic_id: &str,
        limit: u32,
        question_type: Option<&str>,
    ) -> Result<QuestionsResponse> {
        let url = format!("{}/api/practice-questions", &self.base_url);
        let mut params = vec![
            ("subjectId", subject_slug.to_string()),
            ("unitId", unit_id.to_string()),
            ("topicId", topic_id.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(t) = question_type {
            params.push(("type", t.to_string()));
        }
        let res = self.client.get(&url)
            .query(&params)
            .send()
            .context("Failed to send practice-questions request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Practice-questions request failed: {} - {}", status, txt);
        }
        let resp: QuestionsResponse = res.json().context("Parsing practice-questions json")?;
        Ok(resp)
    }
}
