//! Metric cards shown above a module's table.

use crate::models::{MetricasMensuales, ResumenTributario};
use crate::resources::ViewContext;
use crate::tax::variation_percent;
use ratatui::prelude::Color;
use rust_decimal::Decimal;

/// One figure in the card row.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    /// Month-over-month change in percent, when there is a previous month.
    pub variation: Option<Decimal>,
}

impl MetricCard {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            variation: None,
        }
    }

    pub fn amount(label: impl Into<String>, amount: Decimal) -> Self {
        Self::new(label, format!("S/ {:.2}", amount))
    }

    fn with_variation(mut self, variation: Option<Decimal>) -> Self {
        self.variation = variation;
        self
    }

    /// "+12.5%" / "-3.0%" / "sin datos previos".
    pub fn variation_label(&self) -> String {
        match self.variation {
            Some(v) if v.is_sign_negative() => format!("{:.1}%", v),
            Some(v) => format!("+{:.1}%", v),
            None => "sin datos previos".to_string(),
        }
    }

    pub fn variation_color(&self) -> Color {
        match self.variation {
            Some(v) if v.is_sign_negative() => Color::Red,
            Some(v) if v.is_zero() => Color::Gray,
            Some(_) => Color::Green,
            None => Color::DarkGray,
        }
    }
}

/// Cards for the incomes or expenses module. Flat-tax clients get the totals
/// only; the other regimes also see IGV and the per-treatment breakdown.
pub fn movimiento_cards(metricas: &MetricasMensuales, ctx: &ViewContext) -> Vec<MetricCard> {
    let mut cards = vec![
        MetricCard::amount("Total del mes", metricas.total_mes_actual).with_variation(
            variation_percent(metricas.total_mes_actual, metricas.total_mes_anterior),
        ),
        MetricCard::amount("Mes anterior", metricas.total_mes_anterior),
    ];
    if ctx.is_flat_tax() {
        return cards;
    }
    cards.push(MetricCard::amount("IGV del mes", metricas.igv_mes_actual));
    cards.extend(
        metricas
            .por_tipo_tributario
            .iter()
            .map(|(tipo, amount)| MetricCard::amount(tipo.as_str(), *amount)),
    );
    cards
}

/// Row count per status, in tab order. Used by modules without a metrics
/// endpoint.
pub fn status_cards<'a>(
    tabs: &[&'static str],
    statuses: impl Iterator<Item = Option<&'a str>>,
) -> Vec<MetricCard> {
    let mut counts = vec![0usize; tabs.len()];
    let mut total = 0usize;
    for status in statuses {
        total += 1;
        if let Some(i) = status.and_then(|s| tabs.iter().position(|t| *t == s)) {
            counts[i] += 1;
        }
    }
    std::iter::once(MetricCard::new("Total", total.to_string()))
        .chain(
            tabs.iter()
                .zip(counts)
                .map(|(tab, count)| MetricCard::new(*tab, count.to_string())),
        )
        .collect()
}

pub fn resumen_cards(resumen: &ResumenTributario) -> Vec<MetricCard> {
    vec![
        MetricCard::amount("Ingresos", resumen.total_ingresos),
        MetricCard::amount("Egresos", resumen.total_egresos),
        MetricCard::amount("IGV ventas", resumen.igv_ventas),
        MetricCard::amount("IGV compras", resumen.igv_compras),
        MetricCard::amount("IGV por pagar", resumen.igv_por_pagar),
        MetricCard::amount("Renta estimada", resumen.renta_estimada),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegimenTributario;
    use crate::resources::test_support::cliente;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn metricas() -> MetricasMensuales {
        MetricasMensuales {
            total_mes_actual: dec("1100"),
            total_mes_anterior: dec("1000"),
            igv_mes_actual: dec("180"),
            por_tipo_tributario: [
                ("EXONERADA".to_string(), dec("100")),
                ("GRAVADA".to_string(), dec("1000")),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn flat_tax_cards_hide_igv() {
        let cards = movimiento_cards(&metricas(), &cliente(RegimenTributario::Nrus));
        let labels: Vec<&str> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Total del mes", "Mes anterior"]);
        assert_eq!(cards[0].value, "S/ 1100.00");
        assert_eq!(cards[0].variation_label(), "+10.0%");
    }

    #[test]
    fn general_regime_cards_include_breakdown() {
        let cards = movimiento_cards(&metricas(), &cliente(RegimenTributario::Rg));
        let labels: Vec<&str> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Total del mes", "Mes anterior", "IGV del mes", "EXONERADA", "GRAVADA"]
        );
        assert_eq!(cards[2].value, "S/ 180.00");
    }

    #[test]
    fn no_previous_month_has_no_variation() {
        let metricas = MetricasMensuales {
            total_mes_actual: dec("50"),
            ..Default::default()
        };
        let cards = movimiento_cards(&metricas, &cliente(RegimenTributario::Rer));
        assert_eq!(cards[0].variation, None);
        assert_eq!(cards[0].variation_label(), "sin datos previos");
        assert_eq!(cards[0].variation_color(), Color::DarkGray);
    }

    #[test]
    fn status_cards_count_per_tab() {
        let tabs = ["ACTIVA", "VISTA", "RESUELTA"];
        let statuses = [Some("ACTIVA"), Some("RESUELTA"), Some("ACTIVA"), None];
        let cards = status_cards(&tabs, statuses.into_iter());
        let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["4", "2", "0", "1"]);
    }
}
