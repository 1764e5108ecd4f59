//! Derived monetary values for a predio.
//!
//! Applies the liquidation policy of the tax office: surcharges and
//! collection costs default to a fixed rate over the base tax when the
//! request does not provide them, and the subsidy default is configurable
//! because both a zero default and a percentage-of-subtotal default exist
//! in the field.

use lazy_static::lazy_static;
use rust_decimal::Decimal;

use crate::predio::models::Predio;

lazy_static! {
    static ref TASA_RECARGOS: Decimal = Decimal::new(2, 2);
    static ref TASA_GASTOS_COBRANZA: Decimal = Decimal::new(1, 2);
    static ref CIEN: Decimal = Decimal::from(100);
}

/// Default applied when the request carries no explicit subsidy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubsidioPolicy {
    /// No subsidy unless the request provides one.
    #[default]
    Cero,
    /// Subsidy is the given percentage of the subtotal (0-100).
    PorcentajeSubtotal(Decimal),
}

impl SubsidioPolicy {
    /// Parse the `PREDIAL_SUBSIDY_POLICY` value: `"cero"` or `"porcentaje:<n>"`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("cero") || raw == "0" {
            return Ok(Self::Cero);
        }
        if let Some(pct) = raw.strip_prefix("porcentaje:") {
            let pct: Decimal = pct
                .trim()
                .parse()
                .map_err(|_| format!("porcentaje de subsidio inválido: '{}'", pct.trim()))?;
            if pct < Decimal::ZERO || pct > *CIEN {
                return Err(format!(
                    "el porcentaje de subsidio debe estar entre 0 y 100: {pct}"
                ));
            }
            return Ok(Self::PorcentajeSubtotal(pct));
        }
        Err(format!("política de subsidio desconocida: '{raw}'"))
    }
}

/// All amounts derived from one predio, ready for display formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Liquidacion {
    pub impuesto_predial: Decimal,
    pub recargos: Decimal,
    pub multas: Decimal,
    pub gastos_cobranza: Decimal,
    pub subtotal: Decimal,
    pub subsidio: Decimal,
    pub total_a_pagar: Decimal,
    pub superficie_terreno: Decimal,
    pub valor_terreno: Decimal,
    pub superficie_construccion: Decimal,
    pub valor_construccion: Decimal,
}

impl Liquidacion {
    /// Compute every derived amount for one predio under the given subsidy policy.
    pub fn calcular(predio: &Predio, politica: SubsidioPolicy) -> Self {
        let impuesto = &predio.impuesto;
        let base = impuesto.impuesto_predial;

        let recargos = match impuesto.recargos {
            Some(valor) if valor > Decimal::ZERO => valor,
            _ => base * *TASA_RECARGOS,
        };
        let gastos_cobranza = match impuesto.gastos_cobranza {
            Some(valor) if valor > Decimal::ZERO => valor,
            _ => base * *TASA_GASTOS_COBRANZA,
        };
        let multas = match impuesto.multas {
            Some(valor) if valor > Decimal::ZERO => valor,
            _ => Decimal::ZERO,
        };

        let subtotal = base + recargos + gastos_cobranza;

        let subsidio = match impuesto.subsidio {
            Some(valor) if valor > Decimal::ZERO => valor,
            _ => match politica {
                SubsidioPolicy::Cero => Decimal::ZERO,
                SubsidioPolicy::PorcentajeSubtotal(pct) => (subtotal * pct / *CIEN).round_dp(2),
            },
        };

        let total_a_pagar = subtotal + multas - subsidio;

        Self {
            impuesto_predial: base,
            recargos,
            multas,
            gastos_cobranza,
            subtotal,
            subsidio,
            total_a_pagar,
            superficie_terreno: predio.terreno.metros_terreno_propio
                + predio.terreno.metros_terreno_comun,
            valor_terreno: predio.terreno.valor_terreno_propio
                + predio.terreno.valor_terreno_comun,
            superficie_construccion: predio.construccion.metros_construccion_propia
                + predio.construccion.metros_construccion_comun,
            valor_construccion: predio.construccion.valor_construccion_propia
                + predio.construccion.valor_construccion_comun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predio::models::{Construccion, Impuesto, Predio, Terreno};

    fn predio_base(impuesto_predial: Decimal) -> Predio {
        Predio {
            clave_catastral: "123-45-678-90-12-AB1".to_string(),
            folio: 1785,
            direccion: "Av. Juárez 100".to_string(),
            contribuyente: "María López".to_string(),
            terreno: Terreno {
                valor_terreno_propio: Decimal::from(250000),
                metros_terreno_propio: "120.5".parse().unwrap(),
                valor_terreno_comun: Decimal::from(50000),
                metros_terreno_comun: "30.5".parse().unwrap(),
            },
            construccion: Construccion {
                valor_construccion_propia: Decimal::from(400000),
                metros_construccion_propia: Decimal::from(90),
                valor_construccion_comun: Decimal::ZERO,
                metros_construccion_comun: Decimal::ZERO,
            },
            impuesto: Impuesto {
                impuesto_predial,
                cantidad_con_letra: "Diez mil pesos 00/100 M.N.".to_string(),
                recargos: None,
                multas: None,
                gastos_cobranza: None,
                subsidio: None,
                ultimo_periodo_pagado: None,
            },
        }
    }

    #[test]
    fn test_tasas_por_defecto() {
        let liq = Liquidacion::calcular(&predio_base(Decimal::from(10000)), SubsidioPolicy::Cero);
        assert_eq!(liq.recargos, Decimal::from(200));
        assert_eq!(liq.gastos_cobranza, Decimal::from(100));
        assert_eq!(liq.subtotal, Decimal::from(10300));
        assert_eq!(liq.subsidio, Decimal::ZERO);
        assert_eq!(liq.total_a_pagar, Decimal::from(10300));
    }

    #[test]
    fn test_base_cero() {
        let liq = Liquidacion::calcular(&predio_base(Decimal::ZERO), SubsidioPolicy::Cero);
        assert_eq!(liq.recargos, Decimal::ZERO);
        assert_eq!(liq.gastos_cobranza, Decimal::ZERO);
        assert_eq!(liq.total_a_pagar, Decimal::ZERO);
    }

    #[test]
    fn test_valores_explicitos_tienen_prioridad() {
        let mut predio = predio_base(Decimal::from(10000));
        predio.impuesto.recargos = Some(Decimal::from(500));
        predio.impuesto.gastos_cobranza = Some(Decimal::from(50));
        let liq = Liquidacion::calcular(&predio, SubsidioPolicy::Cero);
        assert_eq!(liq.recargos, Decimal::from(500));
        assert_eq!(liq.gastos_cobranza, Decimal::from(50));
        assert_eq!(liq.subtotal, Decimal::from(10550));
    }

    #[test]
    fn test_politica_porcentaje_subtotal() {
        let politica = SubsidioPolicy::PorcentajeSubtotal(Decimal::from(10));
        let liq = Liquidacion::calcular(&predio_base(Decimal::from(10000)), politica);
        assert_eq!(liq.subsidio, Decimal::from(1030));
        assert_eq!(liq.total_a_pagar, Decimal::from(9270));
    }

    #[test]
    fn test_subsidio_explicito_ignora_politica() {
        let mut predio = predio_base(Decimal::from(10000));
        predio.impuesto.subsidio = Some(Decimal::from(300));
        let politica = SubsidioPolicy::PorcentajeSubtotal(Decimal::from(10));
        let liq = Liquidacion::calcular(&predio, politica);
        assert_eq!(liq.subsidio, Decimal::from(300));
        assert_eq!(liq.total_a_pagar, Decimal::from(10000));
    }

    #[test]
    fn test_parse_politica() {
        assert_eq!(SubsidioPolicy::parse("cero").unwrap(), SubsidioPolicy::Cero);
        assert_eq!(
            SubsidioPolicy::parse("porcentaje:10").unwrap(),
            SubsidioPolicy::PorcentajeSubtotal(Decimal::from(10))
        );
        assert!(SubsidioPolicy::parse("porcentaje:150").is_err());
        assert!(SubsidioPolicy::parse("mitad").is_err());
    }
}
