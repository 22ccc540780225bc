//! "Cômodos": room counts.

use super::FieldSpec;

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::integer("dormitorios", "dormitorios"),
    FieldSpec::integer("suites", "suites"),
    FieldSpec::integer("banheiros", "banheiros"),
    FieldSpec::integer("lavabos", "lavabos"),
    FieldSpec::integer("salas", "salas"),
    FieldSpec::integer("cozinhas", "cozinhas"),
    FieldSpec::integer("vagasGaragem", "vagas_garagem"),
    FieldSpec::yes_no("areaServico", "area_servico"),
    FieldSpec::yes_no("dependenciaEmpregada", "dependencia_empregada"),
];
