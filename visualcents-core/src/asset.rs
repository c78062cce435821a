//! Accounts and wallets that hold a balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AssetType {
    #[serde(rename = "cash")]
    Cash,
    #[serde(rename = "debit")]
    Debit,
    #[serde(rename = "credit")]
    Credit,
    #[serde(rename = "virtual")]
    Virtual,
    #[serde(rename = "investment")]
    Investment,
}

impl AssetType {
    pub fn icon_name(&self) -> &'static str {
        match self {
            AssetType::Cash => "banknote",
            AssetType::Debit => "creditcard",
            AssetType::Credit => "creditcard.fill",
            AssetType::Virtual => "iphone",
            AssetType::Investment => "chart.line.uptrend.xyaxis",
        }
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            AssetType::Cash => "#4CAF50",
            AssetType::Debit => "#2196F3",
            AssetType::Credit => "#FF9800",
            AssetType::Virtual => "#9C27B0",
            AssetType::Investment => "#00BCD4",
        }
    }

    /// Credit balances count as liabilities
    pub fn is_liability(&self) -> bool {
        matches!(self, AssetType::Credit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub asset_type: AssetType,
    pub balance: Decimal,
    /// ISO currency code, "CNY" unless set
    pub currency: String,
    /// Whether net-worth totals include this asset
    pub is_included_in_total: bool,
    pub sort_order: u32,
}

impl Asset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, asset_type: AssetType, balance: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            asset_type,
            balance,
            currency: "CNY".to_string(),
            is_included_in_total: true,
            sort_order: 0,
        }
    }

    pub fn excluded_from_total(mut self) -> Self {
        self.is_included_in_total = false;
        self
    }

    /// Wallets created on first launch.
    pub fn defaults() -> Vec<Asset> {
        vec![
            Asset::new("cash", "现金", AssetType::Cash, Decimal::ZERO),
            Asset::new("wechat", "微信支付", AssetType::Virtual, Decimal::ZERO),
            Asset::new("alipay", "支付宝", AssetType::Virtual, Decimal::ZERO),
            Asset::new("bank", "银行卡", AssetType::Debit, Decimal::ZERO),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_assets() {
        let assets = Asset::defaults();
        assert_eq!(assets.len(), 4);
        assert!(assets.iter().all(|a| a.currency == "CNY" && a.is_included_in_total));
        assert_eq!(assets[1].asset_type, AssetType::Virtual);
    }

    #[test]
    fn test_asset_type_visuals() {
        assert_eq!(AssetType::Credit.icon_name(), "creditcard.fill");
        assert_eq!(AssetType::Cash.default_color(), "#4CAF50");
        assert!(AssetType::Credit.is_liability());
        assert!(!AssetType::Investment.is_liability());
    }
}
