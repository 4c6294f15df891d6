//! Room catalog queries and staff edit bodies

use serde::Deserialize;

use cr_core::domain::{Building, RoomEquipment, RoomType};
use cr_core::repositories::{RoomOrdering, RoomSearch};
use cr_core::services::RoomDraft;
use cr_shared::error_codes;

use crate::handlers::ApiError;

/// `GET /api/rooms` query string
///
/// Equipment flags only count when they equal `true`; an unreadable
/// `min_capacity` or `ordering` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomListParams {
    pub building: Option<String>,
    pub search: Option<String>,
    pub min_capacity: Option<String>,
    pub has_projector: Option<String>,
    pub has_whiteboard: Option<String>,
    pub has_mic: Option<String>,
    pub has_network: Option<String>,
    pub ordering: Option<String>,
}

impl RoomListParams {
    pub fn parse(&self) -> Result<RoomSearch, ApiError> {
        let building = match non_empty(&self.building) {
            None => None,
            Some(raw) => Some(parse_building(raw)?),
        };

        Ok(RoomSearch {
            building,
            keyword: non_empty(&self.search).map(str::to_string),
            min_capacity: non_empty(&self.min_capacity).and_then(|v| v.parse().ok()),
            has_projector: is_true(&self.has_projector),
            has_whiteboard: is_true(&self.has_whiteboard),
            has_mic: is_true(&self.has_mic),
            has_network: is_true(&self.has_network),
            ordering: non_empty(&self.ordering)
                .and_then(|v| v.parse::<RoomOrdering>().ok())
                .unwrap_or_default(),
        })
    }
}

/// Editable room attributes, the body of `PUT /api/rooms/{code}`
#[derive(Debug, Clone, Deserialize)]
pub struct RoomAttributes {
    pub building: String,
    #[serde(default)]
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub equipment: RoomEquipment,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl RoomAttributes {
    pub fn into_draft(self) -> Result<RoomDraft, ApiError> {
        let room_type = match self.room_type.as_deref().map(str::trim) {
            None | Some("") => RoomType::default(),
            Some(raw) => raw
                .parse::<RoomType>()
                .map_err(|e| ApiError::bad_request(error_codes::BAD_REQUEST, e))?,
        };

        Ok(RoomDraft {
            building: parse_building(self.building.trim())?,
            name: self.name,
            capacity: self.capacity,
            room_type,
            equipment: self.equipment,
            is_active: self.is_active,
        })
    }
}

/// Body of `POST /api/rooms`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(alias = "room_code")]
    pub code: String,
    #[serde(flatten)]
    pub attributes: RoomAttributes,
}

fn default_active() -> bool {
    true
}

fn parse_building(raw: &str) -> Result<Building, ApiError> {
    raw.parse::<Building>()
        .map_err(|e| ApiError::bad_request(error_codes::BAD_REQUEST, e))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_true(value: &Option<String>) -> bool {
    non_empty(value).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cr_core::repositories::RoomSortKey;

    #[test]
    fn test_building_filter() {
        let params = RoomListParams {
            building: Some("ins".into()),
            ..Default::default()
        };
        assert_eq!(params.parse().unwrap().building, Some(Building::Ins));
        assert_eq!(RoomListParams::default().parse().unwrap(), RoomSearch::default());

        let params = RoomListParams {
            building: Some("XYZ".into()),
            ..Default::default()
        };
        assert!(params.parse().is_err());
    }

    #[test]
    fn test_search_params() {
        let search = RoomListParams {
            search: Some(" lab ".into()),
            min_capacity: Some("40".into()),
            has_projector: Some("True".into()),
            has_mic: Some("yes".into()),
            ordering: Some("-capacity".into()),
            ..Default::default()
        }
        .parse()
        .unwrap();

        assert_eq!(search.keyword.as_deref(), Some("lab"));
        assert_eq!(search.min_capacity, Some(40));
        assert!(search.has_projector);
        assert!(!search.has_mic);
        assert_eq!(search.ordering.key, RoomSortKey::Capacity);
        assert!(search.ordering.descending);

        let lenient = RoomListParams {
            min_capacity: Some("many".into()),
            ordering: Some("name".into()),
            ..Default::default()
        }
        .parse()
        .unwrap();
        assert_eq!(lenient.min_capacity, None);
        assert_eq!(lenient.ordering, RoomOrdering::default());
    }

    #[test]
    fn test_create_body_defaults() {
        let request: CreateRoomRequest = serde_json::from_str(
            r#"{"room_code":"GH2-301","building":"GH2","capacity":30,"equipment":{"has_mic":true}}"#,
        )
        .unwrap();
        assert_eq!(request.code, "GH2-301");

        let draft = request.attributes.into_draft().unwrap();
        assert_eq!(draft.building, Building::Gh2);
        assert_eq!(draft.room_type, RoomType::Normal);
        assert!(draft.equipment.has_mic);
        assert!(draft.equipment.has_whiteboard);
        assert!(draft.is_active);
    }

    #[test]
    fn test_bad_room_type_rejected() {
        let attributes: RoomAttributes =
            serde_json::from_str(r#"{"building":"INS","capacity":10,"room_type":"GYM"}"#).unwrap();
        assert!(matches!(attributes.into_draft(), Err(ApiError::BadRequest { .. })));
    }
}
