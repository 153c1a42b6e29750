//! Demo fixture loaded by [`PlanningService::seed_demo_data`](crate::PlanningService::seed_demo_data).

pub(crate) struct DemoTeam {
    pub full_name: &'static str,
    pub display_name: &'static str,
    pub color: &'static str,
    pub members: &'static [DemoEmployee],
}

pub(crate) struct DemoEmployee {
    pub full_name: &'static str,
    pub display_name: &'static str,
    pub can_edit: bool,
    pub email: &'static str,
}

const fn member(full_name: &'static str, display_name: &'static str, can_edit: bool, email: &'static str) -> DemoEmployee {
    DemoEmployee {
        full_name,
        display_name,
        can_edit,
        email,
    }
}

/// Five teams of two to four people. The first editor of each team becomes its manager.
pub(crate) const DEMO_TEAMS: &[DemoTeam] = &[
    DemoTeam {
        full_name: "Technical Team Barcelona",
        display_name: "TEC-BCN",
        color: "#FF5733",
        members: &[
            member("Carlos García", "CG", true, "carlos.garcia@demo.com"),
            member("Ana Martínez", "AM", true, "ana.martinez@demo.com"),
            member("David López", "DL", false, "david.lopez@demo.com"),
            member("Laura Sánchez", "LS", false, "laura.sanchez@demo.com"),
        ],
    },
    DemoTeam {
        full_name: "Administration Team",
        display_name: "ADM",
        color: "#33C4FF",
        members: &[
            member("María González", "MG", true, "maria.gonzalez@demo.com"),
            member("Juan Rodríguez", "JR", false, "juan.rodriguez@demo.com"),
            member("Elena Fernández", "EF", false, "elena.fernandez@demo.com"),
        ],
    },
    DemoTeam {
        full_name: "Sales Team Madrid",
        display_name: "SALES-MAD",
        color: "#28A745",
        members: &[
            member("Pedro Jiménez", "PJ", true, "pedro.jimenez@demo.com"),
            member("Carmen Ruiz", "CR", false, "carmen.ruiz@demo.com"),
            member("Alberto Moreno", "AMO", false, "alberto.moreno@demo.com"),
        ],
    },
    DemoTeam {
        full_name: "Marketing Team",
        display_name: "MKT",
        color: "#FFC107",
        members: &[
            member("Sofía Torres", "ST", true, "sofia.torres@demo.com"),
            member("Miguel Ramírez", "MR", false, "miguel.ramirez@demo.com"),
        ],
    },
    DemoTeam {
        full_name: "Operations Team",
        display_name: "OPS",
        color: "#6F42C1",
        members: &[
            member("Isabel Castro", "IC", true, "isabel.castro@demo.com"),
            member("Francisco Ortiz", "FO", false, "francisco.ortiz@demo.com"),
            member("Patricia Gómez", "PG", false, "patricia.gomez@demo.com"),
        ],
    },
];
