use serde::Deserialize;

/// Body of `POST /Properties`. Required fields are checked in the service so
/// that omissions surface as validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePropertyRequest {
    pub images: Option<Vec<String>>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub property: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub bedroom: Option<i32>,
    pub area: Option<f64>,
    pub price: Option<f64>,
    #[serde(alias = "negotiationable")]
    pub negotiable: Option<bool>,
}

/// Raw `/search` query string; values are parsed by the service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub property: Option<String>,
    pub bedroom: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}
