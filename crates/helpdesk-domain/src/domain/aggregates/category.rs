//! Category and subcategory entities
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Id, SlaDuration};
use crate::wire;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    #[serde(default, with = "wire::text")]
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: Id,
    #[serde(default, with = "wire::text")]
    pub name: String,
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde(default, with = "wire::sla")]
    pub sla_response_time: Option<SlaDuration>,
    #[serde(default, with = "wire::sla")]
    pub sla_resolution_time: Option<SlaDuration>,
}

impl Category {
    pub fn subcategory(&self, id: &Id) -> Option<&Subcategory> {
        self.subcategories.iter().find(|sub| &sub.id == id)
    }
}

/// Name of the parent category of `sub`, looked up in `categories`.
pub fn parent_name<'a>(categories: &'a [Category], sub: &Subcategory) -> Option<&'a str> {
    let parent = sub.category_id.as_ref()?;
    categories
        .iter()
        .find(|cat| &cat.id == parent)
        .map(|cat| cat.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_with_embedded_subcategories() {
        let cats: Vec<Category> = serde_json::from_str(
            r#"[{"id":1,"name":"Rede","subcategories":[
                {"id":10,"name":"VPN","categoryId":1,"slaResponseTime":"01:00:00","slaResolutionTime":"1.00:00:00"}
            ]}]"#,
        )
        .unwrap();
        let vpn = cats[0].subcategory(&Id::Number(10)).unwrap();
        assert_eq!(vpn.sla_resolution_time.unwrap().total_hours(), 24);
        assert_eq!(parent_name(&cats, vpn), Some("Rede"));
        assert!(cats[0].subcategory(&Id::Number(11)).is_none());
    }
}
