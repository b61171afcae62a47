//! Static page data that is not editable from the admin panel.

use serde::Serialize;

/// A headline figure shown on the home page.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Highlight {
    pub value: &'static str,
    pub label: &'static str,
}

/// A physical clinic unit listed on the contact page.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClinicUnit {
    pub name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub hours: &'static str,
    pub map_url: &'static str,
}

pub const HIGHLIGHTS: &[Highlight] = &[
    Highlight {
        value: "20+",
        label: "anos de experiência",
    },
    Highlight {
        value: "60+",
        label: "especialistas",
    },
    Highlight {
        value: "300 mil",
        label: "atendimentos por ano",
    },
    Highlight {
        value: "4",
        label: "unidades",
    },
];

pub const UNITS: &[ClinicUnit] = &[
    ClinicUnit {
        name: "Unidade Paulista",
        address: "Av. Paulista, 1000 - Bela Vista, São Paulo - SP",
        phone: "(11) 3000-0000",
        hours: "Seg. a sex., 7h às 19h; sáb., 7h às 12h",
        map_url: "https://maps.google.com/?q=Av.+Paulista,+1000",
    },
    ClinicUnit {
        name: "Unidade Moema",
        address: "Av. Ibirapuera, 2500 - Moema, São Paulo - SP",
        phone: "(11) 3000-0001",
        hours: "Seg. a sex., 7h às 19h",
        map_url: "https://maps.google.com/?q=Av.+Ibirapuera,+2500",
    },
];
