use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::RoomHeader;

/// Asset value rollup. Key casing matches the web client.
#[derive(Debug, Serialize)]
pub struct AssetsSummaryResponse {
    #[serde(rename = "byRoom")]
    pub by_room: HashMap<Uuid, f64>,
    #[serde(rename = "byFloor")]
    pub by_floor: HashMap<String, f64>,
    #[serde(rename = "byHouse")]
    pub by_house: f64,
    pub rooms: Vec<RoomHeader>,
}
