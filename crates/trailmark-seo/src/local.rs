//! Local SEO: business markup for the site owner and destination markup
//! for location-tagged posts.

use serde_json::{json, Map, Value};

use trailmark_core::{BlogPost, BusinessProfile, EntityMention, EntityType, SiteConfig};

use crate::meta::{geo_tags, GeoTags};
use crate::schema::SCHEMA_CONTEXT;

pub struct LocalSeoOptimizer {
    site: SiteConfig,
}

impl LocalSeoOptimizer {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// `LocalBusiness`, or `ProfessionalService` when a service type is set.
    /// `None` when the site has no business profile.
    pub fn business_schema(&self) -> Option<Value> {
        let business = self.site.business.as_ref()?;
        let schema_type = if business.service_type.is_some() {
            "ProfessionalService"
        } else {
            "LocalBusiness"
        };
        let name = if business.name.trim().is_empty() {
            self.site.name.clone()
        } else {
            business.name.clone()
        };

        let mut obj = Map::new();
        obj.insert("@context".into(), json!(SCHEMA_CONTEXT));
        obj.insert("@type".into(), json!(schema_type));
        obj.insert("@id".into(), json!(format!("{}/#business", self.site.url)));
        obj.insert("name".into(), json!(name));
        obj.insert("url".into(), json!(self.site.url));
        obj.insert("image".into(), json!(self.site.absolute_url(&self.site.logo)));
        if let Some(address) = postal_address(business) {
            obj.insert("address".into(), address);
        }
        if let (Some(lat), Some(lng)) = (business.latitude, business.longitude) {
            obj.insert(
                "geo".into(),
                json!({ "@type": "GeoCoordinates", "latitude": lat, "longitude": lng }),
            );
        }
        let optional = [
            ("description", &business.description),
            ("telephone", &business.telephone),
            ("email", &business.email),
            ("priceRange", &business.price_range),
            ("serviceType", &business.service_type),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                obj.insert(key.into(), json!(v));
            }
        }
        if !business.area_served.is_empty() {
            let areas: Vec<Value> = business
                .area_served
                .iter()
                .map(|a| json!({ "@type": "Place", "name": a }))
                .collect();
            obj.insert("areaServed".into(), Value::Array(areas));
        }
        if !business.opening_hours.is_empty() {
            obj.insert("openingHours".into(), json!(business.opening_hours));
        }
        if !self.site.social_profiles.is_empty() {
            obj.insert("sameAs".into(), json!(self.site.social_profiles));
        }
        Some(Value::Object(obj))
    }

    /// `TouristDestination` for a location-tagged post.
    pub fn destination_schema(&self, post: &BlogPost, entities: &[EntityMention]) -> Option<Value> {
        let location = post.location.as_deref().filter(|l| !l.trim().is_empty())?;
        let mut obj = Map::new();
        obj.insert("@context".into(), json!(SCHEMA_CONTEXT));
        obj.insert("@type".into(), json!("TouristDestination"));
        obj.insert(
            "@id".into(),
            json!(format!("{}#destination", self.site.post_url(&post.slug))),
        );
        obj.insert("name".into(), json!(location));
        obj.insert("url".into(), json!(self.site.post_url(&post.slug)));
        if let Some((lat, lng)) = post.coordinates_lat_lng() {
            obj.insert(
                "geo".into(),
                json!({ "@type": "GeoCoordinates", "latitude": lat, "longitude": lng }),
            );
        }

        let attractions: Vec<Value> = entities
            .iter()
            .filter(|e| matches!(e.entity_type, EntityType::Cultural | EntityType::Event))
            .map(|e| json!({ "@type": "TouristAttraction", "name": e.name }))
            .collect();
        if !attractions.is_empty() {
            obj.insert("includesAttraction".into(), Value::Array(attractions));
        }

        let activities: Vec<&str> = entities
            .iter()
            .filter(|e| e.entity_type == EntityType::Activity)
            .map(|e| e.name.as_str())
            .collect();
        if !activities.is_empty() {
            obj.insert("touristType".into(), json!(activities));
        }
        Some(Value::Object(obj))
    }

    pub fn geo_meta(&self, post: &BlogPost) -> Option<GeoTags> {
        geo_tags(post)
    }
}

fn postal_address(business: &BusinessProfile) -> Option<Value> {
    let fields = [
        ("streetAddress", &business.street_address),
        ("addressLocality", &business.locality),
        ("addressRegion", &business.region),
        ("postalCode", &business.postal_code),
        ("addressCountry", &business.country),
    ];
    let mut address = Map::new();
    for (key, value) in fields {
        if let Some(v) = value {
            address.insert(key.into(), json!(v));
        }
    }
    if address.is_empty() {
        return None;
    }
    address.insert("@type".into(), json!("PostalAddress"));
    Some(Value::Object(address))
}
