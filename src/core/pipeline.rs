use crate::core::{Answer, ConfigProvider, DogApi, DogHouse, Pipeline, RunReport, Storage};
use crate::utils::error::{DogHouseError, Result};
use serde::Serialize;

pub const REPORT_FILENAME: &str = "answer.json";

/// Local copy of what was computed and what the server said.
#[derive(Debug, Serialize)]
struct AnswerReport<'a> {
    generated_at: String,
    base_url: &'a str,
    dry_run: bool,
    answer: &'a Answer,
    orphan_dogs: usize,
    response: Option<&'a serde_json::Value>,
}

/// Fetch → aggregate → submit against one API.
///
/// `storage` is only used when the config names an output path.
pub struct DogHousePipeline<A: DogApi, S: Storage, C: ConfigProvider> {
    pub(crate) api: A,
    pub(crate) storage: Option<S>,
    pub(crate) config: C,
}

impl<A: DogApi, S: Storage, C: ConfigProvider> DogHousePipeline<A, S, C> {
    pub fn new(api: A, storage: Option<S>, config: C) -> Self {
        Self {
            api,
            storage,
            config,
        }
    }

    async fn write_report(
        &self,
        storage: &S,
        house: &DogHouse,
        answer: &Answer,
        response: Option<&serde_json::Value>,
    ) -> Result<String> {
        let report = AnswerReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            base_url: self.config.base_url(),
            dry_run: self.config.dry_run(),
            answer,
            orphan_dogs: house.orphan_dogs().len(),
            response,
        };
        let json = serde_json::to_vec_pretty(&report)?;

        tracing::debug!("Writing report ({} bytes) to storage", json.len());
        storage.write_file(REPORT_FILENAME, &json).await
    }
}

#[async_trait::async_trait]
impl<A: DogApi, S: Storage, C: ConfigProvider> Pipeline for DogHousePipeline<A, S, C> {
    async fn authorize(&self) -> Result<String> {
        if let Some(token) = self.config.token() {
            tracing::debug!("Using configured token");
            return Ok(token.to_string());
        }

        // 沒有 token 時用帳號密碼換一個
        if let Some((email, password)) = self.config.credentials() {
            tracing::info!("🔑 Requesting token for {}", email);
            let token = self.api.authenticate(email, password).await?;
            if token.is_empty() {
                return Err(DogHouseError::MissingToken);
            }
            return Ok(token);
        }

        Err(DogHouseError::MissingToken)
    }

    async fn extract(&self, token: &str) -> Result<DogHouse> {
        tracing::info!("🚀 Fetching breeds and dogs from: {}", self.config.base_url());

        let mut house = DogHouse::new();
        house.get_data(&self.api, token).await?;

        tracing::info!(
            "✅ Loaded {} breeds and {} dogs",
            house.get_total_breeds(),
            house.get_total_dogs()
        );
        Ok(house)
    }

    async fn transform(&self, house: &DogHouse) -> Result<Answer> {
        let answer = house.answer()?;
        tracing::info!(
            "🐕 Most common breed: {}, most common name: {}",
            answer.common_breed,
            answer.common_dog_name
        );
        Ok(answer)
    }

    async fn load(&self, house: &DogHouse, answer: Answer, token: &str) -> Result<RunReport> {
        let response = if self.config.dry_run() {
            tracing::info!("🔍 DRY RUN MODE - answer not submitted");
            None
        } else {
            Some(house.send_data(&self.api, &answer, token).await?)
        };

        let report_path = match (&self.storage, self.config.output_path()) {
            (Some(storage), Some(_)) => Some(
                self.write_report(storage, house, &answer, response.as_ref())
                    .await?,
            ),
            _ => None,
        };

        Ok(RunReport {
            answer,
            response,
            report_path,
        })
    }
}
