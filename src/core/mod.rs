pub mod etl;
pub mod pipeline;

pub use crate::domain::doghouse::DogHouse;
pub use crate::domain::model::{Answer, Breed, Dog, RunReport};
pub use crate::domain::ports::{ConfigProvider, DogApi, Pipeline, Storage};
pub use crate::utils::error::Result;
