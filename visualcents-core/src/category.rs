//! Spending/income categories.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    /// Display name ("Food & Dining")
    pub name: String,
    pub icon_name: String,
    /// Hex color without the leading '#'
    pub color_hex: String,
    pub sort_order: u32,
    /// System-created default
    pub is_default: bool,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon_name: impl Into<String>,
        color_hex: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon_name: icon_name.into(),
            color_hex: color_hex.into(),
            sort_order: 0,
            is_default: false,
        }
    }

    /// The default expense/income categories, in display order.
    pub fn defaults() -> Vec<Category> {
        [
            ("food", "Food & Dining", "fork.knife", "FF9F68"),
            ("transport", "Transport", "car.fill", "5DADE2"),
            ("shopping", "Shopping", "bag.fill", "AF7AC5"),
            ("entertainment", "Entertainment", "gamecontroller.fill", "45B7D1"),
            ("health", "Health", "heart.fill", "E74C3C"),
            ("income", "Income", "arrow.down.circle.fill", "58D68D"),
            ("other", "Other", "ellipsis.circle.fill", "95A5A6"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (id, name, icon, color))| Category {
            sort_order: i as u32,
            is_default: true,
            ..Category::new(id, name, icon, color)
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_categories() {
        let cats = Category::defaults();
        assert_eq!(cats.len(), 7);
        assert_eq!(cats[0].name, "Food & Dining");
        assert_eq!(cats[6].id, "other");
        assert!(cats.iter().all(|c| c.is_default));
        assert!(cats.windows(2).all(|w| w[0].sort_order < w[1].sort_order));
    }
}
