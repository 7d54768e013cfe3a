//! Glasses bridge interface
//!
//! The bridge owns page containers on the glasses. An image page holds one
//! full-screen image container that is updated with PNG frames; a list page
//! holds text containers whose items are replaced wholesale on every rebuild.
//!
//! With the `serde` feature the container and payload types serialize with
//! the field names the bridge SDK expects (`containerID`, `imageData`, ...).
//!
//! Input comes back from the glasses as list events on the container that
//! captures events; [`RingAction::from_list_index`] decodes them.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that can occur on a bridge call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Bridge answered with a non-zero status code
    Rejected(i32),
    /// Bridge is not connected
    Unavailable,
    /// Call failed in transit
    Transport,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Rejected(code) => write!(f, "bridge rejected call (status {})", code),
            BridgeError::Unavailable => write!(f, "bridge unavailable"),
            BridgeError::Transport => write!(f, "bridge transport error"),
        }
    }
}

/// Full-frame image container
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageContainer {
    #[cfg_attr(feature = "serde", serde(rename = "containerID"))]
    pub id: u32,
    #[cfg_attr(feature = "serde", serde(rename = "containerName"))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "xPosition"))]
    pub x: u32,
    #[cfg_attr(feature = "serde", serde(rename = "yPosition"))]
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Items shown in one list container
///
/// On the wire this is the SDK's `itemContainer`; its `itemCount` is taken
/// from `names` when serializing and ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "ItemContainer", from = "ItemContainer"))]
pub struct ListItems {
    pub item_width: u32,
    /// Draw a border around the selected item
    pub select_border: bool,
    pub names: Vec<String>,
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct ItemContainer {
    #[serde(rename = "itemCount", default)]
    count: usize,
    #[serde(rename = "itemWidth")]
    item_width: u32,
    #[serde(rename = "isItemSelectBorderEn", with = "flag")]
    select_border: bool,
    #[serde(rename = "itemName")]
    names: Vec<String>,
}

#[cfg(feature = "serde")]
impl From<ListItems> for ItemContainer {
    fn from(items: ListItems) -> Self {
        Self {
            count: items.names.len(),
            item_width: items.item_width,
            select_border: items.select_border,
            names: items.names,
        }
    }
}

#[cfg(feature = "serde")]
impl From<ItemContainer> for ListItems {
    fn from(wire: ItemContainer) -> Self {
        Self {
            item_width: wire.item_width,
            select_border: wire.select_border,
            names: wire.names,
        }
    }
}

/// Text list container
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListContainer {
    #[cfg_attr(feature = "serde", serde(rename = "containerID"))]
    pub id: u32,
    #[cfg_attr(feature = "serde", serde(rename = "containerName"))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "xPosition"))]
    pub x: u32,
    #[cfg_attr(feature = "serde", serde(rename = "yPosition"))]
    pub y: u32,
    pub width: u32,
    pub height: u32,
    #[cfg_attr(feature = "serde", serde(rename = "itemContainer"))]
    pub items: ListItems,
    /// Ring/touch events are delivered to this container
    #[cfg_attr(feature = "serde", serde(rename = "isEventCapture", with = "flag"))]
    pub event_capture: bool,
}

/// One image update for an image container
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImagePayload {
    #[cfg_attr(feature = "serde", serde(rename = "containerID"))]
    pub container_id: u32,
    #[cfg_attr(feature = "serde", serde(rename = "containerName"))]
    pub container_name: String,
    /// Base64 (standard alphabet, padded) PNG bytes
    #[cfg_attr(feature = "serde", serde(rename = "imageData"))]
    pub image_data: String,
}

impl ImagePayload {
    /// Build a payload from encoded PNG bytes
    pub fn from_png(container_id: u32, container_name: &str, png: &[u8]) -> Self {
        Self {
            container_id,
            container_name: String::from(container_name),
            image_data: STANDARD.encode(png),
        }
    }

    /// Decode the image data back to PNG bytes
    pub fn png_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.image_data)
    }
}

/// Ring controller input, delivered as list events on the capturing container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RingAction {
    /// Tap
    Click,
    /// Forward swipe
    Next,
    /// Backward swipe
    Prev,
}

// List event item indices
const LIST_INDEX_NEXT: u32 = 1;
const LIST_INDEX_PREV: u32 = 2;

impl RingAction {
    /// Map the item index of a list event to an action
    ///
    /// Any index other than the two swipe indices, including a missing one
    /// reported as 0, is a tap.
    pub const fn from_list_index(index: u32) -> Self {
        match index {
            LIST_INDEX_NEXT => RingAction::Next,
            LIST_INDEX_PREV => RingAction::Prev,
            _ => RingAction::Click,
        }
    }
}

/// Trait for the glasses bridge
///
/// Calls are synchronous from the pipeline's point of view; an async host
/// resolves its futures inside the implementation.
pub trait DisplayBridge {
    /// Create the start-up page with one image container
    fn create_image_page(&mut self, container: &ImageContainer) -> Result<(), BridgeError>;

    /// Create the start-up page with text list containers
    fn create_list_page(&mut self, containers: &[ListContainer]) -> Result<(), BridgeError>;

    /// Replace the contents of the list page
    fn rebuild_list_page(&mut self, containers: &[ListContainer]) -> Result<(), BridgeError>;

    /// Push a new image into an image container
    fn update_image(&mut self, payload: &ImagePayload) -> Result<(), BridgeError>;

    /// Tear down the current page
    fn shutdown_page(&mut self) -> Result<(), BridgeError>;
}

/// Booleans travel as 0/1 integers on the bridge
#[cfg(feature = "serde")]
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_base64() {
        let payload = ImagePayload::from_png(100, "lyrics", b"\x89PNG");
        assert_eq!(payload.container_id, 100);
        assert_eq!(payload.container_name, "lyrics");
        assert_eq!(payload.image_data, "iVBORw==");
        assert_eq!(payload.png_bytes().unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_ring_action_from_list_index() {
        assert_eq!(RingAction::from_list_index(0), RingAction::Click);
        assert_eq!(RingAction::from_list_index(1), RingAction::Next);
        assert_eq!(RingAction::from_list_index(2), RingAction::Prev);
        assert_eq!(RingAction::from_list_index(3), RingAction::Click);
        assert_eq!(RingAction::from_list_index(u32::MAX), RingAction::Click);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_list_container_wire_shape() {
        let container = ListContainer {
            id: 102,
            name: String::from("current"),
            x: 15,
            y: 150,
            width: 610,
            height: 70,
            items: ListItems {
                item_width: 590,
                select_border: true,
                names: alloc::vec![String::from("first"), String::from("second")],
            },
            event_capture: true,
        };

        let json = serde_json::to_value(&container).unwrap();
        assert_eq!(json["containerID"], 102);
        assert_eq!(json["containerName"], "current");
        assert_eq!(json["xPosition"], 15);
        assert_eq!(json["yPosition"], 150);
        assert_eq!(json["isEventCapture"], 1);
        let items = &json["itemContainer"];
        assert_eq!(items["itemCount"], 2);
        assert_eq!(items["itemWidth"], 590);
        assert_eq!(items["isItemSelectBorderEn"], 1);
        assert_eq!(items["itemName"], serde_json::json!(["first", "second"]));

        let back: ListContainer = serde_json::from_value(json).unwrap();
        assert_eq!(back, container);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_list_flags_off_serialize_as_zero() {
        let items = ListItems {
            item_width: 590,
            select_border: false,
            names: alloc::vec![String::new()],
        };
        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(json["isItemSelectBorderEn"], 0);
        assert_eq!(json["itemCount"], 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_payload_and_image_container_wire_shape() {
        let payload = ImagePayload::from_png(100, "lyrics", b"\x89PNG");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["containerID"], 100);
        assert_eq!(json["containerName"], "lyrics");
        assert_eq!(json["imageData"], "iVBORw==");

        let image = ImageContainer {
            id: 100,
            name: String::from("lyrics"),
            x: 0,
            y: 0,
            width: 576,
            height: 200,
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["xPosition"], 0);
        assert_eq!(json["width"], 576);
        assert_eq!(json["height"], 200);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_ring_action_names() {
        assert_eq!(serde_json::to_value(RingAction::Next).unwrap(), "next");
        let action: RingAction = serde_json::from_str("\"prev\"").unwrap();
        assert_eq!(action, RingAction::Prev);
    }

    #[test]
    fn test_payload_padding() {
        assert_eq!(ImagePayload::from_png(1, "a", b"ab").image_data, "YWI=");
        assert_eq!(ImagePayload::from_png(1, "a", b"").image_data, "");
    }
}
