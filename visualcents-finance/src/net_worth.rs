//! Net worth across wallets and accounts.

use rust_decimal::Decimal;
use serde::Serialize;
use visualcents_core::Asset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NetWorth {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
}

impl NetWorth {
    /// Only assets flagged `is_included_in_total` count. Credit balances are
    /// liabilities whatever their sign.
    pub fn of(assets: &[Asset]) -> Self {
        let included = assets.iter().filter(|a| a.is_included_in_total);
        let (liabilities, holdings): (Vec<&Asset>, Vec<&Asset>) =
            included.partition(|a| a.asset_type.is_liability());

        let total_assets: Decimal = holdings.iter().map(|a| a.balance).sum();
        let total_liabilities: Decimal = liabilities.iter().map(|a| a.balance.abs()).sum();

        Self {
            total_assets,
            total_liabilities,
            net_worth: total_assets - total_liabilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use visualcents_core::AssetType;

    #[test]
    fn test_net_worth() {
        let assets = vec![
            Asset::new("cash", "现金", AssetType::Cash, dec!(200)),
            Asset::new("bank", "银行卡", AssetType::Debit, dec!(5000)),
            Asset::new("card", "信用卡", AssetType::Credit, dec!(-1200)),
            Asset::new("fund", "基金", AssetType::Investment, dec!(3000)).excluded_from_total(),
        ];
        let nw = NetWorth::of(&assets);
        assert_eq!(nw.total_assets, dec!(5200));
        assert_eq!(nw.total_liabilities, dec!(1200));
        assert_eq!(nw.net_worth, dec!(4000));
    }

    #[test]
    fn test_positive_credit_balance_is_still_debt() {
        let assets = vec![Asset::new("card", "信用卡", AssetType::Credit, dec!(300))];
        assert_eq!(NetWorth::of(&assets).net_worth, dec!(-300));
        assert_eq!(NetWorth::of(&[]), NetWorth::default());
    }
}
