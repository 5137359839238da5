use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingPackage {
    pub id: String,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub category: PackageCategory,
    pub features: Vec<String>,
    pub is_team_package: bool,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PackageCategory {
    Freelancer,
    Team,
}

impl PackageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageCategory::Freelancer => "Freelancer",
            PackageCategory::Team => "Team",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Freelancer" => Some(PackageCategory::Freelancer),
            "Team" => Some(PackageCategory::Team),
            _ => None,
        }
    }
}
