use serde::{Deserialize, Serialize};

use super::user::{User, UserId};
use super::work::WorkRecord;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default = "default_page")]
    pub current_page: u32,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

fn default_page() -> u32 {
    1
}

impl<T> Paginated<T> {
    pub fn single(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            data,
            current_page: 1,
            last_page: Some(1),
            per_page: None,
            total: Some(total),
        }
    }
}

/// Props of the daily-works page: assignable users plus the current page of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWorksPage {
    #[serde(default)]
    pub incharges: Vec<User>,
    #[serde(default)]
    pub juniors: Vec<User>,
    pub daily_works: Paginated<WorkRecord>,
}

impl DailyWorksPage {
    pub fn find_user(&self, id: UserId) -> Option<&User> {
        self.incharges
            .iter()
            .chain(self.juniors.iter())
            .find(|user| user.id == id)
    }

    pub fn user_name(&self, id: Option<UserId>) -> Option<&str> {
        id.and_then(|id| self.find_user(id)).map(|user| user.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_page_props() {
        let json = r#"{
            "incharges": [{"id": 1, "name": "Rahim"}],
            "juniors": [{"id": 2, "name": "Karim", "designation": "SE"}],
            "daily_works": {
                "data": [{"id": 5, "number": "P-5", "type": "Pavement", "status": "new"}],
                "current_page": 2,
                "last_page": 4,
                "total": 31
            }
        }"#;
        let page: DailyWorksPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.daily_works.data.len(), 1);
        assert_eq!(page.daily_works.current_page, 2);
        assert_eq!(page.user_name(Some(UserId(2))), Some("Karim"));
        assert_eq!(page.user_name(Some(UserId(9))), None);
        assert_eq!(page.user_name(None), None);
    }

    #[test]
    fn users_and_pagination_default() {
        let json = r#"{"daily_works": {"data": []}}"#;
        let page: DailyWorksPage = serde_json::from_str(json).unwrap();
        assert!(page.incharges.is_empty());
        assert_eq!(page.daily_works.current_page, 1);
    }
}
