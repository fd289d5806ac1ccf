//! Binary snapshot codec.
//!
//! Snapshots are bincode-encoded typed collections, read back as the same
//! collection type they were written from.

use crate::{
    error::{AppError, AppResult},
    models::{item::Item, person::Person},
};

pub fn encode_items(items: &[Item]) -> AppResult<Vec<u8>> {
    bincode::serialize(items)
        .map_err(|e| AppError::Internal(format!("Failed to encode item snapshot: {}", e)))
}

pub fn decode_items(bytes: &[u8]) -> AppResult<Vec<Item>> {
    bincode::deserialize(bytes)
        .map_err(|e| AppError::InvalidFormat(format!("binary item snapshot: {}", e)))
}

pub fn encode_persons(persons: &[Person]) -> AppResult<Vec<u8>> {
    bincode::serialize(persons)
        .map_err(|e| AppError::Internal(format!("Failed to encode person snapshot: {}", e)))
}

pub fn decode_persons(bytes: &[u8]) -> AppResult<Vec<Person>> {
    bincode::deserialize(bytes)
        .map_err(|e| AppError::InvalidFormat(format!("binary person snapshot: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::ItemKind;

    #[test]
    fn test_items_round_trip() {
        let items = vec![
            Item::new_book("Lalka", "Bolesław Prus", 1890, "powieść"),
            Item::new_magazine("Przekrój", 2023, 7),
        ];

        let bytes = encode_items(&items).unwrap();
        let decoded = decode_items(&bytes).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_items(&[0xff, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat(_)));
    }

    #[test]
    fn test_loaned_state_survives() {
        let mut item = Item::new_book("Ferdydurke", "Witold Gombrowicz", 1937, "powieść");
        item.available = false;
        item.loaned_to = Some("alice".to_string());

        let decoded = decode_items(&encode_items(&[item.clone()]).unwrap()).unwrap();
        assert_eq!(decoded[0].loaned_to.as_deref(), Some("alice"));
        assert!(!decoded[0].available);
        assert!(matches!(decoded[0].kind, ItemKind::Book { .. }));
    }
}
