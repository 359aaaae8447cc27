//! MCNP particle designators

// crate modules
use crate::error::Error;

/// Complete collection of MCNP particle variants
///
/// The particle is set to [Particle::Unknown] by default. Conversions accept
/// the particle number, the FMESH designator, the meshtal output tag, or the
/// full name from the user manual, all insensitive to case.
///
/// ```rust
/// # use meshops_mesh::Particle;
/// assert_eq!(Particle::try_from("a").unwrap(), Particle::Alpha);
/// assert_eq!(Particle::try_from("34").unwrap(), Particle::Alpha);
/// assert_eq!(Particle::try_from(34u8).unwrap(), Particle::Alpha);
/// assert_eq!(Particle::try_from("alpha").unwrap(), Particle::Alpha);
/// assert_eq!(Particle::try_from("Alpha Particle").unwrap(), Particle::Alpha);
///
/// // failed conversions are errors
/// assert!(Particle::try_from("invalid").is_err());
/// assert!(Particle::try_from(56u8).is_err());
/// ```
///
/// The positron designator is not valid on the FMESH card since it is treated
/// as an electron, so it never appears as a meshtal tag.
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Ord, Eq)]
pub enum Particle {
    #[default]
    Unknown = 0,
    Neutron = 1,
    Photon = 2,
    Electron = 3,
    NegativeMuon = 4,
    AntiNeutron = 5,
    ElectronNeutrino = 6,
    MuonNeutrino = 7,
    Positron = 8,
    Proton = 9,
    LambdaBaryon = 10,
    PosSigmaBaryon = 11,
    NegSigmaBaryon = 12,
    XiBaryon = 13,
    NegXiBaryon = 14,
    OmegaBaryon = 15,
    PosMuon = 16,
    AntiElectronNeutrino = 17,
    AntiMuonNeutrino = 18,
    AntiProton = 19,
    PosPion = 20,
    NeuPion = 21,
    PosKaon = 22,
    ShortKaon = 23,
    LongKaon = 24,
    AntiLambdaBaryon = 25,
    AntiPosSigmaBaryon = 26,
    AntiNegSigmaBaryon = 27,
    AntiNeuXiBaryon = 28,
    PosXiBaryon = 29,
    AntiOmega = 30,
    Deuteron = 31,
    Triton = 32,
    Helion = 33,
    Alpha = 34,
    NegPion = 35,
    NegKaon = 36,
    HeavyIon = 37,
}

/// (variant, designator, meshtal tag, full name), indexed by particle number
#[rustfmt::skip]
const PARTICLES: [(Particle, &str, &str, &str); 38] = [
    (Particle::Unknown,              "",  "unknown",  "unknown"),
    (Particle::Neutron,              "n", "neutron",  "neutron"),
    (Particle::Photon,               "p", "photon",   "photon"),
    (Particle::Electron,             "e", "electron", "electron"),
    (Particle::NegativeMuon,         "|", "mu_minus", "negative muon"),
    (Particle::AntiNeutron,          "q", "aneutron", "anti neutron"),
    (Particle::ElectronNeutrino,     "u", "nu_e",     "electron neutrino"),
    (Particle::MuonNeutrino,         "v", "nu_m",     "muon neutrino"),
    (Particle::Positron,             "f", "positron", "positron"),
    (Particle::Proton,               "h", "proton",   "proton"),
    (Particle::LambdaBaryon,         "l", "lambda0",  "lambda baryon"),
    (Particle::PosSigmaBaryon,       "+", "sigma+",   "positive sigma baryon"),
    (Particle::NegSigmaBaryon,       "-", "sigma-",   "negative sigma baryon"),
    (Particle::XiBaryon,             "x", "xi0",      "cascade; xi baryon"),
    (Particle::NegXiBaryon,          "y", "xi_minus", "negative cascade; negative xi baryon"),
    (Particle::OmegaBaryon,          "o", "omega-",   "omega baryon"),
    (Particle::PosMuon,              "!", "mu_plus",  "positive muon"),
    (Particle::AntiElectronNeutrino, "<", "anu_e",    "anti electron neutrino"),
    (Particle::AntiMuonNeutrino,     ">", "anu_m",    "anti muon neutrino"),
    (Particle::AntiProton,           "g", "aproton",  "anti proton"),
    (Particle::PosPion,              "/", "pi_plus",  "positive pion"),
    (Particle::NeuPion,              "z", "pi_zero",  "neutral pion"),
    (Particle::PosKaon,              "k", "k_plus",   "positive kaon"),
    (Particle::ShortKaon,            "%", "k0_short", "kaon, short"),
    (Particle::LongKaon,             "^", "k0_long",  "kaon, long"),
    (Particle::AntiLambdaBaryon,     "b", "alambda0", "anti lambda baryon"),
    (Particle::AntiPosSigmaBaryon,   "_", "asigma+",  "anti positive sigma baryon"),
    (Particle::AntiNegSigmaBaryon,   "~", "asigma-",  "anti negative sigma baryon"),
    (Particle::AntiNeuXiBaryon,      "c", "axi0",     "anti cascade; anti neutral xi baryon"),
    (Particle::PosXiBaryon,          "w", "xi_plus",  "positive cascade; positive xi baryon"),
    (Particle::AntiOmega,            "@", "aomega-",  "anti omega"),
    (Particle::Deuteron,             "d", "deuteron", "deuteron"),
    (Particle::Triton,               "t", "triton",   "triton"),
    (Particle::Helion,               "s", "helion",   "helion"),
    (Particle::Alpha,                "a", "alpha",    "alpha particle"),
    (Particle::NegPion,              "*", "pi_minus", "negative pion"),
    (Particle::NegKaon,              "?", "k_minus",  "negative kaon"),
    (Particle::HeavyIon,             "#", "heavyion", "heavy ions"),
];

impl Particle {
    /// An alternative to using `Neutron as u8`
    #[inline]
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Tag used for the particle in meshtal headers, e.g. "neutron"
    pub fn tag(&self) -> &'static str {
        PARTICLES[self.id() as usize].2
    }
}

impl std::fmt::Display for Particle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Convert from any valid numerical designator
impl TryFrom<u8> for Particle {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        PARTICLES
            .get(v as usize)
            .map(|p| p.0)
            .ok_or(Error::FailedToInferParticle(v.to_string()))
    }
}

/// Convert from any valid designator, name, or meshtal output tag
impl TryFrom<&str> for Particle {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim().to_lowercase();

        if let Ok(id) = s.parse::<u8>() {
            return Self::try_from(id);
        }

        PARTICLES
            .iter()
            .find(|(_, symbol, tag, name)| {
                (!symbol.is_empty() && *symbol == s) || *tag == s || *name == s
            })
            .map(|p| p.0)
            .ok_or(Error::FailedToInferParticle(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_discriminants() {
        for (i, (particle, ..)) in PARTICLES.iter().enumerate() {
            assert_eq!(particle.id() as usize, i);
        }
    }

    #[test]
    fn unknown_and_cascades() {
        assert_eq!(Particle::try_from("unknown").unwrap(), Particle::Unknown);
        assert_eq!(Particle::try_from(0u8).unwrap(), Particle::Unknown);
        assert_eq!(Particle::try_from("xi_plus").unwrap(), Particle::PosXiBaryon);
        assert_eq!(Particle::try_from(29u8).unwrap(), Particle::PosXiBaryon);
        assert!(Particle::try_from("").is_err());
    }

    #[test]
    fn meshtal_tags() {
        assert_eq!(Particle::try_from("Aneutron").unwrap(), Particle::AntiNeutron);
        assert_eq!(Particle::Photon.tag(), "photon");
        assert_eq!(Particle::Neutron.to_string(), "neutron");
    }
}
