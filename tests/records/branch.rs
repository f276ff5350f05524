//! An entity declared outside the crate, the way an application would.

use attune_records::Entity;
use serde::{Deserialize, Serialize};

attune_records::choice! {
    pub enum Region {
        North => "north",
        South => "south",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(noun = "Branch")]
pub struct BranchOffice {
    #[entity(required, min_len = 3, search)]
    pub name: String,
    #[entity(required, search)]
    pub city: String,
    #[entity(email, optional)]
    pub manager_email: String,
    pub region: Region,
    #[entity(min = 0)]
    pub members: u32,
    #[entity(min = 0.0, max = 5.0)]
    pub satisfaction: f64,
    #[entity(min_items = 1)]
    pub services: Vec<String>,
}

impl BranchOffice {
    pub fn new(name: &str, city: &str, region: Region, members: u32) -> Self {
        Self {
            name: name.to_string(),
            city: city.to_string(),
            manager_email: String::new(),
            region,
            members,
            satisfaction: 4.2,
            services: vec!["teller".to_string()],
        }
    }
}
