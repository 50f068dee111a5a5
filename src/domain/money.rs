use anyhow::Context;

/// Converts a COP major-unit total (as the order store reports it) to
/// integer cents. This is the single conversion point: every amount
/// comparison in the reconciler goes through it, so the same total always
/// yields the same cents value. Rounding is half-away-from-zero.
pub fn cop_to_cents(total: &str) -> anyhow::Result<i64> {
    let value: f64 = total
        .trim()
        .parse()
        .with_context(|| format!("order total is not numeric: {total:?}"))?;
    anyhow::ensure!(value.is_finite(), "order total is not finite: {total:?}");
    Ok((value * 100.0).round() as i64)
}
