use crate::domain::doghouse::DogHouse;
use crate::domain::model::{Answer, Breed, Dog, RunReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn token(&self) -> Option<&str>;
    fn credentials(&self) -> Option<(&str, &str)>;
    fn timeout(&self) -> Option<Duration>;
    fn output_path(&self) -> Option<&str>;
    fn dry_run(&self) -> bool;
}

/// The remote dogs API.
#[async_trait]
pub trait DogApi: Send + Sync {
    async fn fetch_breeds(&self, token: &str) -> Result<Vec<Breed>>;
    async fn fetch_dogs(&self, token: &str) -> Result<Vec<Dog>>;
    async fn send_answer(&self, answer: &Answer, token: &str) -> Result<serde_json::Value>;
    async fn authenticate(&self, email: &str, password: &str) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn authorize(&self) -> Result<String>;
    async fn extract(&self, token: &str) -> Result<DogHouse>;
    async fn transform(&self, house: &DogHouse) -> Result<Answer>;
    async fn load(&self, house: &DogHouse, answer: Answer, token: &str) -> Result<RunReport>;
}
