use serde::{Deserialize, Serialize};

/// One dog as served by `/api/v1/dogs/`. `breed` is the id of its breed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    id: i64,
    name: String,
    breed: i64,
}

impl Dog {
    pub fn new(id: i64, name: impl Into<String>, breed: i64) -> Self {
        Self {
            id,
            name: name.into(),
            breed,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn breed(&self) -> i64 {
        self.breed
    }
}

/// A breed and the dogs joined to it.
///
/// `dogs` never travels over the wire; it is filled by [`DogHouse`] after
/// both collections are loaded.
///
/// [`DogHouse`]: crate::domain::doghouse::DogHouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    dogs: Vec<Dog>,
}

impl Breed {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            dogs: Vec::new(),
        }
    }

    pub fn add_dog(&mut self, dog: Dog) {
        self.dogs.push(dog);
    }

    pub fn dogs_count(&self) -> usize {
        self.dogs.len()
    }

    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }

    pub(crate) fn clear_dogs(&mut self) {
        self.dogs.clear();
    }
}

/// Body posted to `/api/v1/answer/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub total_dogs: usize,
    pub total_breeds: usize,
    pub common_breed: String,
    pub common_dog_name: String,
}

/// Envelope of the list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

/// What one full run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub answer: Answer,
    /// Raw server reply to the submission; `None` on dry runs.
    pub response: Option<serde_json::Value>,
    pub report_path: Option<String>,
}
