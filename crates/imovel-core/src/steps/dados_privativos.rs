//! "Dados privativos": internal data never shown on listings.

use super::FieldSpec;

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("matricula", "matricula"),
    FieldSpec::text("inscricaoMunicipal", "inscricao_municipal"),
    FieldSpec::text("localChaves", "local_chaves"),
    FieldSpec::decimal("comissao", "comissao"),
    FieldSpec::text("observacoesPrivativas", "observacoes_privativas"),
];
