/// A single legal point value for one evaluation of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringOption {
    pub delta: i64,
    pub label: &'static str,
}

/// A skill category players are evaluated on.
///
/// The catalog is fixed for the lifetime of a tournament; `key` is the stable
/// identifier used in saved files, `name` is for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub key: &'static str,
    pub name: &'static str,
    pub options: &'static [ScoringOption],
}

impl Challenge {
    /// Check whether `delta` is one of this challenge's scoring options
    pub fn is_legal_delta(&self, delta: i64) -> bool {
        self.options.iter().any(|o| o.delta == delta)
    }

    /// Legal point values, in catalog order
    pub fn legal_deltas(&self) -> Vec<i64> {
        self.options.iter().map(|o| o.delta).collect()
    }
}

pub const RECEPCION: &str = "recepcion";
pub const ATAQUE: &str = "ataque";
pub const DEFENSA: &str = "defensa";
pub const SAQUE: &str = "saque";
pub const BLOQUEO: &str = "bloqueo";
pub const COLOCACION: &str = "colocacion";

const fn opt(delta: i64, label: &'static str) -> ScoringOption {
    ScoringOption { delta, label }
}

/// All challenges in display order
pub static CHALLENGES: [Challenge; 6] = [
    Challenge {
        key: RECEPCION,
        name: "Recepción",
        options: &[
            opt(3, "Balón en zona"),
            opt(2, "Balón cerca de zona"),
            opt(1, "Balón controlado"),
            opt(0, "Recepción fallida"),
        ],
    },
    Challenge {
        key: ATAQUE,
        name: "Ataque",
        options: &[
            opt(5, "Directo al objetivo"),
            opt(3, "En zona objetivo"),
            opt(1, "Dentro de cancha"),
            opt(0, "Fuera/Red/Bloqueo"),
        ],
    },
    Challenge {
        key: DEFENSA,
        name: "Defensa",
        options: &[
            opt(4, "Recuperación controlada"),
            opt(2, "Recuperación sin control"),
            opt(1, "Toca, no controla"),
            opt(0, "Fallo completo"),
        ],
    },
    Challenge {
        key: SAQUE,
        name: "Saque",
        options: &[
            opt(5, "Ace en zona"),
            opt(3, "En zona, recibido"),
            opt(1, "En cancha, fuera zona"),
            opt(0, "Falta de saque"),
        ],
    },
    Challenge {
        key: BLOQUEO,
        name: "Bloqueo",
        options: &[
            opt(5, "Punto de bloqueo"),
            opt(3, "Toque controlado"),
            opt(1, "Toca, no controla"),
            opt(0, "Fallo de bloqueo"),
        ],
    },
    Challenge {
        key: COLOCACION,
        name: "Colocación",
        options: &[
            opt(5, "Directo al aro"),
            opt(3, "Cerca del aro"),
            opt(1, "Controlada, fuera zona"),
            opt(0, "Colocación fallida"),
        ],
    },
];

pub fn all() -> &'static [Challenge] {
    &CHALLENGES
}

/// Look up a challenge by key (case-insensitive)
pub fn find(key: &str) -> Option<&'static Challenge> {
    let key = key.trim();
    CHALLENGES.iter().find(|c| c.key.eq_ignore_ascii_case(key))
}

pub fn keys() -> impl Iterator<Item = &'static str> {
    CHALLENGES.iter().map(|c| c.key)
}
