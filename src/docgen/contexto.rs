//! Substitution context assembly.
//!
//! Flattens one predio plus its liquidation into the placeholder mapping
//! consumed by the render engine. A `BTreeMap` keeps the key order stable so
//! two builds over the same predio are bit-identical.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::docgen::calculo::{Liquidacion, SubsidioPolicy};
use crate::docgen::common::{format_money, format_number};
use crate::predio::models::Predio;

/// Mapping placeholder-name -> formatted display value.
pub type ContextoSustitucion = BTreeMap<String, String>;

/// Key-naming convention expected by a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum KeyConvention {
    /// Dotted attribute paths: `p.terreno.valor_propio`.
    #[default]
    DottedPath,
    /// Legacy flat keys: `VALOR_TERRENO_PROPIO`.
    FlatUpper,
}

/// Builds substitution contexts for one or several predios.
pub struct ContextBuilder {
    politica: SubsidioPolicy,
    convencion: KeyConvention,
}

impl ContextBuilder {
    pub fn new(politica: SubsidioPolicy, convencion: KeyConvention) -> Self {
        Self {
            politica,
            convencion,
        }
    }

    /// Context for a single-record template: one flattened predio under the `p` root.
    pub fn single(&self, predio: &Predio) -> ContextoSustitucion {
        self.build(predio, "p", "")
    }

    /// One context per predio, in request order.
    pub fn multi(&self, predios: &[Predio]) -> Vec<ContextoSustitucion> {
        predios.iter().map(|p| self.single(p)).collect()
    }

    /// Context for a multi-record template: every predio under an indexed
    /// root (`p1.`, `p2.`, ... or `P1_`, `P2_`, ...) plus the record count.
    pub fn merged(&self, predios: &[Predio]) -> ContextoSustitucion {
        let mut ctx = ContextoSustitucion::new();
        for (i, predio) in predios.iter().enumerate() {
            let n = i + 1;
            let parcial = match self.convencion {
                KeyConvention::DottedPath => self.build(predio, &format!("p{n}"), ""),
                KeyConvention::FlatUpper => self.build(predio, "", &format!("P{n}_")),
            };
            ctx.extend(parcial);
        }
        let total = predios.len().to_string();
        match self.convencion {
            KeyConvention::DottedPath => ctx.insert("predios.total".to_string(), total),
            KeyConvention::FlatUpper => ctx.insert("TOTAL_PREDIOS".to_string(), total),
        };
        ctx
    }

    fn build(&self, predio: &Predio, raiz: &str, prefijo: &str) -> ContextoSustitucion {
        let liq = Liquidacion::calcular(predio, self.politica);
        let mut ctx = ContextoSustitucion::new();

        let mut put = |dotted: &str, flat: &str, valor: String| {
            match self.convencion {
                KeyConvention::DottedPath => ctx.insert(format!("{raiz}.{dotted}"), valor),
                KeyConvention::FlatUpper => ctx.insert(format!("{prefijo}{flat}"), valor),
            };
        };

        put(
            "clave_catastral",
            "CLAVE_CATASTRAL",
            predio.clave_catastral.clone(),
        );
        put("folio", "FOLIO", predio.folio.to_string());
        put("direccion", "DIRECCION", predio.direccion.clone());
        put(
            "contribuyente",
            "CONTRIBUYENTE",
            predio.contribuyente.clone(),
        );

        put(
            "terreno.valor_propio",
            "VALOR_TERRENO_PROPIO",
            format_money(predio.terreno.valor_terreno_propio),
        );
        put(
            "terreno.superficie_propia",
            "METROS_TERRENO_PROPIO",
            format_number(predio.terreno.metros_terreno_propio),
        );
        put(
            "terreno.valor_comun",
            "VALOR_TERRENO_COMUN",
            format_money(predio.terreno.valor_terreno_comun),
        );
        put(
            "terreno.superficie_comun",
            "METROS_TERRENO_COMUN",
            format_number(predio.terreno.metros_terreno_comun),
        );
        put(
            "terreno.valor_total",
            "VALOR_TERRENO_TOTAL",
            format_money(liq.valor_terreno),
        );
        put(
            "terreno.superficie_total",
            "METROS_TERRENO_TOTAL",
            format_number(liq.superficie_terreno),
        );

        put(
            "construccion.valor_propio",
            "VALOR_CONSTRUCCION_PROPIA",
            format_money(predio.construccion.valor_construccion_propia),
        );
        put(
            "construccion.superficie_propia",
            "METROS_CONSTRUCCION_PROPIA",
            format_number(predio.construccion.metros_construccion_propia),
        );
        put(
            "construccion.valor_comun",
            "VALOR_CONSTRUCCION_COMUN",
            format_money(predio.construccion.valor_construccion_comun),
        );
        put(
            "construccion.superficie_comun",
            "METROS_CONSTRUCCION_COMUN",
            format_number(predio.construccion.metros_construccion_comun),
        );
        put(
            "construccion.valor_total",
            "VALOR_CONSTRUCCION_TOTAL",
            format_money(liq.valor_construccion),
        );
        put(
            "construccion.superficie_total",
            "METROS_CONSTRUCCION_TOTAL",
            format_number(liq.superficie_construccion),
        );

        put(
            "impuesto.base",
            "IMPUESTO_PREDIAL",
            format_money(liq.impuesto_predial),
        );
        put(
            "impuesto.cantidad_con_letra",
            "CANTIDAD_CON_LETRA",
            predio.impuesto.cantidad_con_letra.clone(),
        );
        put(
            "impuesto.ultimo_periodo_pagado",
            "ULTIMO_PERIODO_PAGADO",
            predio
                .impuesto
                .ultimo_periodo_pagado
                .clone()
                .unwrap_or_default(),
        );

        put(
            "liquidacion.recargos",
            "RECARGOS",
            format_money(liq.recargos),
        );
        put("liquidacion.multas", "MULTAS", format_money(liq.multas));
        put(
            "liquidacion.gastos_cobranza",
            "GASTOS_COBRANZA",
            format_money(liq.gastos_cobranza),
        );
        put(
            "liquidacion.subtotal",
            "SUBTOTAL",
            format_money(liq.subtotal),
        );
        put(
            "liquidacion.subsidio",
            "SUBSIDIO",
            format_money(liq.subsidio),
        );
        put(
            "liquidacion.total_a_pagar",
            "TOTAL_A_PAGAR",
            format_money(liq.total_a_pagar),
        );

        ctx
    }
}
