use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::model::Role;

/// A listing. `O` is the `createdBy` representation: the owner's id, or an
/// [`Owner`] summary when joined.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property<O = Uuid> {
    pub id: Uuid,
    pub images: Vec<String>,
    pub title: String,
    pub location: String,
    pub description: String,
    pub property: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub bedroom: i32,
    pub area: f64,
    pub price: f64,
    pub negotiable: bool,
    pub created_by: O,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl<O> Property<O> {
    pub fn with_owner<T>(self, owner: T) -> Property<T> {
        Property {
            id: self.id,
            images: self.images,
            title: self.title,
            location: self.location,
            description: self.description,
            property: self.property,
            kind: self.kind,
            bedroom: self.bedroom,
            area: self.area,
            price: self.price,
            negotiable: self.negotiable,
            created_by: owner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Owner fields joined into a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Validated input for a new listing; `created_by` is supplied separately.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub images: Vec<String>,
    pub title: String,
    pub location: String,
    pub description: String,
    pub property: String,
    pub kind: String,
    pub bedroom: i32,
    pub area: f64,
    pub price: f64,
    pub negotiable: bool,
}

#[derive(Debug, FromRow)]
pub struct PropertyRow {
    pub id: Uuid,
    pub images: Vec<String>,
    pub title: String,
    pub location: String,
    pub description: String,
    pub property: String,
    pub property_type: String,
    pub bedroom: i32,
    pub area: f64,
    pub price: f64,
    pub negotiable: bool,
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<PropertyRow> for Property {
    fn from(r: PropertyRow) -> Self {
        Self {
            id: r.id,
            images: r.images,
            title: r.title,
            location: r.location,
            description: r.description,
            property: r.property,
            kind: r.property_type,
            bedroom: r.bedroom,
            area: r.area,
            price: r.price,
            negotiable: r.negotiable,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct PropertyOwnerRow {
    pub id: Uuid,
    pub images: Vec<String>,
    pub title: String,
    pub location: String,
    pub description: String,
    pub property: String,
    pub property_type: String,
    pub bedroom: i32,
    pub area: f64,
    pub price: f64,
    pub negotiable: bool,
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_role: String,
    pub owner_phone_number: String,
}

impl PropertyOwnerRow {
    pub fn into_joined(self, with_phone: bool) -> Result<Property<Owner>, String> {
        let owner = Owner {
            id: self.created_by,
            name: self.owner_name,
            email: self.owner_email,
            role: self.owner_role.parse()?,
            phone_number: with_phone.then_some(self.owner_phone_number),
        };
        Ok(Property {
            id: self.id,
            images: self.images,
            title: self.title,
            location: self.location,
            description: self.description,
            property: self.property,
            kind: self.property_type,
            bedroom: self.bedroom,
            area: self.area,
            price: self.price,
            negotiable: self.negotiable,
            created_by: owner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Conjunctive listing filter. `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub location: Option<String>,
    pub kind: Option<String>,
    pub property: Option<String>,
    pub bedroom: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl SearchFilter {
    /// Case-insensitive substring for text fields, exact bedroom count,
    /// inclusive price bounds.
    pub fn matches<O>(&self, p: &Property<O>) -> bool {
        self.location.as_deref().map_or(true, |s| contains_ci(&p.location, s))
            && self.kind.as_deref().map_or(true, |s| contains_ci(&p.kind, s))
            && self.property.as_deref().map_or(true, |s| contains_ci(&p.property, s))
            && self.bedroom.map_or(true, |b| p.bedroom == b)
            && self.min_price.map_or(true, |min| p.price >= min)
            && self.max_price.map_or(true, |max| p.price <= max)
    }
}

/// `ILIKE` pattern matching `needle` literally anywhere in the value.
pub fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(location: &str, kind: &str, property: &str, bedroom: i32, price: f64) -> Property {
        let now = OffsetDateTime::now_utc();
        Property {
            id: Uuid::new_v4(),
            images: vec!["a.jpg".into()],
            title: "t".into(),
            location: location.into(),
            description: "d".into(),
            property: property.into(),
            kind: kind.into(),
            bedroom,
            area: 50.0,
            price,
            negotiable: false,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = SearchFilter::default();
        assert!(f.matches(&listing("x", "y", "z", 0, 0.0)));
    }

    #[test]
    fn location_is_case_insensitive_substring() {
        let f = SearchFilter {
            location: Some("lake".into()),
            ..Default::default()
        };
        assert!(f.matches(&listing("Lakeview", "rent", "flat", 2, 100.0)));
        assert!(f.matches(&listing("LAKE House", "rent", "flat", 2, 100.0)));
        assert!(!f.matches(&listing("Riverside", "rent", "flat", 2, 100.0)));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let f = SearchFilter {
            min_price: Some(100.0),
            max_price: Some(200.0),
            ..Default::default()
        };
        assert!(f.matches(&listing("a", "b", "c", 1, 100.0)));
        assert!(f.matches(&listing("a", "b", "c", 1, 200.0)));
        assert!(!f.matches(&listing("a", "b", "c", 1, 99.99)));
        assert!(!f.matches(&listing("a", "b", "c", 1, 200.01)));
    }

    #[test]
    fn criteria_are_conjunctive() {
        let f = SearchFilter {
            kind: Some("SALE".into()),
            bedroom: Some(3),
            ..Default::default()
        };
        assert!(f.matches(&listing("a", "for sale", "house", 3, 1.0)));
        assert!(!f.matches(&listing("a", "for sale", "house", 2, 1.0)));
        assert!(!f.matches(&listing("a", "rent", "house", 3, 1.0)));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("lake"), "%lake%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn joined_owner_serializes_as_created_by() {
        let p = listing("a", "b", "c", 1, 1.0).with_owner(Owner {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "ann@x.com".into(),
            role: Role::User,
            phone_number: None,
        });
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["createdBy"]["name"], "Ann");
        assert!(json["createdBy"].get("phoneNumber").is_none());
        assert_eq!(json["type"], "b");
    }
}
