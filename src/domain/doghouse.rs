use crate::domain::model::{Answer, Breed, Dog};
use crate::domain::ports::DogApi;
use crate::utils::error::{DogHouseError, Result};
use std::collections::{HashMap, HashSet};

/// Breeds and dogs loaded for one session, joined by breed id.
///
/// ```
/// use dog_house::{Breed, Dog, DogHouse};
///
/// let mut house = DogHouse::new();
/// house.load(
///     vec![Breed::new(1, "Kiltro"), Breed::new(2, "Beagle")],
///     vec![Dog::new(1, "Rex", 2), Dog::new(2, "Cachupin", 2)],
/// );
/// assert_eq!(house.get_total_dogs(), 2);
/// assert_eq!(house.get_common_breed().unwrap().name, "Beagle");
/// ```
#[derive(Debug, Default, Clone)]
pub struct DogHouse {
    breeds: Vec<Breed>,
    dogs: Vec<Dog>,
}

impl DogHouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches breeds, then dogs, and joins them. Any request failure aborts
    /// the load and leaves the house untouched.
    pub async fn get_data<A: DogApi + ?Sized>(&mut self, api: &A, token: &str) -> Result<()> {
        let breeds = api.fetch_breeds(token).await?;
        tracing::debug!("Fetched {} breeds", breeds.len());

        let dogs = api.fetch_dogs(token).await?;
        tracing::debug!("Fetched {} dogs", dogs.len());

        self.load(breeds, dogs);
        Ok(())
    }

    /// Replaces the current contents and joins dogs into their breeds.
    pub fn load(&mut self, breeds: Vec<Breed>, dogs: Vec<Dog>) {
        self.breeds = breeds;
        self.dogs = dogs;
        self.fill_breeds_with_dogs();
    }

    fn fill_breeds_with_dogs(&mut self) {
        let mut index: HashMap<i64, usize> = HashMap::with_capacity(self.breeds.len());
        for (position, breed) in self.breeds.iter_mut().enumerate() {
            breed.clear_dogs();
            if index.contains_key(&breed.id) {
                tracing::warn!(
                    "⚠️ Duplicate breed id {} ('{}'); dogs go to the first breed with that id",
                    breed.id,
                    breed.name
                );
                continue;
            }
            index.insert(breed.id, position);
        }

        let mut orphans = 0;
        for dog in &self.dogs {
            match index.get(&dog.breed()) {
                Some(&position) => self.breeds[position].add_dog(dog.clone()),
                None => orphans += 1,
            }
        }

        if orphans > 0 {
            tracing::warn!("⚠️ {} dogs reference an unknown breed and were not joined", orphans);
        }
    }

    pub fn breeds(&self) -> &[Breed] {
        &self.breeds
    }

    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }

    /// Dogs whose breed id matches no loaded breed.
    pub fn orphan_dogs(&self) -> Vec<&Dog> {
        let known: HashSet<i64> = self.breeds.iter().map(|breed| breed.id).collect();
        self.dogs
            .iter()
            .filter(|dog| !known.contains(&dog.breed()))
            .collect()
    }

    pub fn get_total_breeds(&self) -> usize {
        self.breeds.len()
    }

    pub fn get_total_dogs(&self) -> usize {
        self.dogs.len()
    }

    /// Breed with the most dogs; ties (zero included) go to the earliest breed.
    pub fn get_common_breed(&self) -> Result<&Breed> {
        let mut breeds = self.breeds.iter();
        let mut most_popular = breeds
            .next()
            .ok_or(DogHouseError::EmptyCollection { collection: "breeds" })?;

        for breed in breeds {
            if breed.dogs_count() > most_popular.dogs_count() {
                most_popular = breed;
            }
        }

        Ok(most_popular)
    }

    /// The first name whose running count strictly beats every earlier best.
    ///
    /// The best starts as the first dog's name at a count of one, so with all
    /// names unique the first dog wins.
    pub fn get_common_dog_name(&self) -> Result<&str> {
        let first = self
            .dogs
            .first()
            .ok_or(DogHouseError::EmptyCollection { collection: "dogs" })?;

        let mut most_popular = first.name();
        let mut highest = 1;
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for dog in &self.dogs {
            let count = counts.entry(dog.name()).or_insert(0);
            *count += 1;
            if *count > highest {
                highest = *count;
                most_popular = dog.name();
            }
        }

        Ok(most_popular)
    }

    pub fn answer(&self) -> Result<Answer> {
        Ok(Answer {
            total_dogs: self.get_total_dogs(),
            total_breeds: self.get_total_breeds(),
            common_breed: self.get_common_breed()?.name.clone(),
            common_dog_name: self.get_common_dog_name()?.to_string(),
        })
    }

    /// Posts the answer. The API does not say whether it was correct; the
    /// raw reply is logged and handed back.
    pub async fn send_data<A: DogApi + ?Sized>(
        &self,
        api: &A,
        answer: &Answer,
        token: &str,
    ) -> Result<serde_json::Value> {
        let response = api.send_answer(answer, token).await?;
        tracing::info!("📨 Answer response: {}", response);
        Ok(response)
    }
}
