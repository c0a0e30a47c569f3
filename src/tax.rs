use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::error::{Error, EzpayResult};

/// 金额是否已含税
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxMode {
    /// 金额已含税，需从中拆出税额
    Inclusive,
    /// 金额未税，税额另外加上
    Exclusive,
}

impl Default for TaxMode {
    fn default() -> Self {
        TaxMode::Inclusive
    }
}

/// 税额拆分结果，`untaxed + tax == total` 恒成立
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBreakdown {
    /// 销售额（未税），对应 `Amt`
    pub untaxed: u64,
    /// 税额，对应 `TaxAmt`
    pub tax: u64,
    /// 含税总额，对应 `TotalAmt`
    pub total: u64,
}

fn div_ceil(numerator: u128, denominator: u128) -> u128 {
    (numerator + denominator - 1) / denominator
}

/// 依税率与含税模式计算税额。
///
/// 税额一律无条件进位，未税额与总额由加减得出。金额超出 u64 时回传 [`Error::Params`]。
pub fn calculate(subtotal: u64, tax_rate: u32, mode: TaxMode) -> EzpayResult<TaxBreakdown> {
    if tax_rate == 0 {
        return Ok(TaxBreakdown {
            untaxed: subtotal,
            tax: 0,
            total: subtotal,
        });
    }

    let rate = tax_rate as u128;
    let amount = subtotal as u128;
    let overflow = || Error::Params(format!("tax on {} at {}% overflows", subtotal, tax_rate));

    match mode {
        TaxMode::Exclusive => {
            let tax = u64::try_from(div_ceil(amount * rate, 100)).map_err(|_| overflow())?;
            let total = subtotal.checked_add(tax).ok_or_else(overflow)?;
            Ok(TaxBreakdown {
                untaxed: subtotal,
                tax,
                total,
            })
        }
        TaxMode::Inclusive => {
            // tax <= total because rate / (100 + rate) < 1
            let tax = u64::try_from(div_ceil(amount * rate, 100 + rate)).map_err(|_| overflow())?;
            Ok(TaxBreakdown {
                untaxed: subtotal - tax,
                tax,
                total: subtotal,
            })
        }
    }
}

/// 旧版单笔金额的未税额算法：`round(fee / (1 + rate / 100))`，四舍五入。
///
/// 仅用于对账旧系统开出的发票，新开发票一律使用 [`calculate`]。
#[deprecated(note = "use tax::calculate with TaxMode::Inclusive")]
pub fn legacy_untaxed_amount(fee: u64, tax_rate: u32) -> u64 {
    let divisor = 100 + tax_rate as u128;
    ((fee as u128 * 200 + divisor) / (2 * divisor)) as u64
}

#[cfg(test)]
mod tests {
    use super::{calculate, TaxBreakdown, TaxMode};
    use crate::error::Error;

    #[test]
    fn exclusive() {
        assert_eq!(
            calculate(1000, 5, TaxMode::Exclusive).unwrap(),
            TaxBreakdown {
                untaxed: 1000,
                tax: 50,
                total: 1050
            }
        );
        // 1001 * 5 / 100 = 50.05
        assert_eq!(calculate(1001, 5, TaxMode::Exclusive).unwrap().tax, 51);
    }

    #[test]
    fn inclusive() {
        assert_eq!(
            calculate(1050, 5, TaxMode::Inclusive).unwrap(),
            TaxBreakdown {
                untaxed: 1000,
                tax: 50,
                total: 1050
            }
        );
        // 100 * 5 / 105 = 4.76
        assert_eq!(
            calculate(100, 5, TaxMode::Inclusive).unwrap(),
            TaxBreakdown {
                untaxed: 95,
                tax: 5,
                total: 100
            }
        );
    }

    #[test]
    fn zero_rate() {
        for mode in [TaxMode::Inclusive, TaxMode::Exclusive].iter() {
            assert_eq!(
                calculate(777, 0, *mode).unwrap(),
                TaxBreakdown {
                    untaxed: 777,
                    tax: 0,
                    total: 777
                }
            );
        }
    }

    #[test]
    fn zero_subtotal() {
        assert_eq!(calculate(0, 5, TaxMode::Exclusive).unwrap().total, 0);
        assert_eq!(calculate(0, 5, TaxMode::Inclusive).unwrap().untaxed, 0);
    }

    #[test]
    fn identity_holds() {
        for rate in [0u32, 1, 5, 10, 17, 99, 100, 250].iter() {
            for subtotal in (0u64..2000).step_by(7).chain([u32::MAX as u64].iter().copied()) {
                for mode in [TaxMode::Inclusive, TaxMode::Exclusive].iter() {
                    let b = calculate(subtotal, *rate, *mode).unwrap();
                    assert_eq!(b.untaxed + b.tax, b.total, "{} {} {:?}", subtotal, rate, mode);
                }
            }
        }
    }

    #[test]
    fn overflow_is_params_error() {
        match calculate(u64::MAX - 10, 5, TaxMode::Exclusive) {
            Err(Error::Params(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(calculate(u64::MAX, u32::MAX, TaxMode::Exclusive).is_err());
        // 含税模式不会超出原金额
        let b = calculate(u64::MAX - 10, 5, TaxMode::Inclusive).unwrap();
        assert_eq!(b.untaxed + b.tax, b.total);
    }

    #[test]
    #[allow(deprecated)]
    fn legacy_rounds_half_away() {
        use super::legacy_untaxed_amount;

        assert_eq!(legacy_untaxed_amount(1050, 5), 1000);
        // 100 / 1.05 = 95.238
        assert_eq!(legacy_untaxed_amount(100, 5), 95);
        assert_eq!(legacy_untaxed_amount(1, 5), 1);
        // 3 / 2 = 1.5
        assert_eq!(legacy_untaxed_amount(3, 100), 2);
        assert_eq!(legacy_untaxed_amount(1, 100), 1);
        assert_eq!(legacy_untaxed_amount(500, 0), 500);
    }
}
