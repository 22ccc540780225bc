//! "Preço": sale and rent values, fees and payment conditions.

use super::FieldSpec;

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::money("valorVenda", "valor_venda"),
    FieldSpec::money("valorLocacao", "valor_locacao"),
    FieldSpec::money("valorCondominio", "valor_condominio"),
    FieldSpec::money("valorIptu", "valor_iptu"),
    FieldSpec::yes_no("aceitaFinanciamento", "aceita_financiamento"),
    FieldSpec::yes_no("aceitaPermuta", "aceita_permuta"),
    FieldSpec::yes_no("exibirValor", "exibir_valor"),
];
