use crate::error::{MaskError, Result};
use crate::masks::{MaskKind, Registry};
use tracing::{info, warn};

/// Which mask is drawn. Changes only on explicit selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaskSelector {
    current: MaskKind,
}

impl MaskSelector {
    pub fn new(initial: MaskKind) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> MaskKind {
        self.current
    }

    /// Switch to the mask called `name`. Unknown or unregistered names are
    /// rejected and the current mask is kept.
    pub fn select(&mut self, name: &str, registry: &Registry) -> Result<MaskKind> {
        let kind = name
            .parse::<MaskKind>()
            .inspect_err(|e| warn!("{e}, keeping {}", self.current))?;
        self.select_kind(kind, registry)
    }

    pub fn select_kind(&mut self, kind: MaskKind, registry: &Registry) -> Result<MaskKind> {
        if !registry.contains(kind) {
            let e = MaskError::UnregisteredMask(kind.name());
            warn!("{e}, keeping {}", self.current);
            return Err(e);
        }

        if kind != self.current {
            info!("Switching mask {} -> {kind}", self.current);
        }
        self.current = kind;
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_iron_man() {
        assert_eq!(MaskSelector::default().current(), MaskKind::IronMan);
    }

    #[test]
    fn invalid_name_keeps_previous() {
        let registry = Registry::default();
        let mut selector = MaskSelector::default();

        assert_eq!(selector.select("batman", &registry), Ok(MaskKind::Batman));
        assert_eq!(
            selector.select("invalidName", &registry),
            Err(MaskError::UnknownMask("invalidName".to_string()))
        );
        assert_eq!(selector.current(), MaskKind::Batman);
    }

    #[test]
    fn unwired_accessory_is_rejected() {
        let mut selector = MaskSelector::new(MaskKind::SpiderMan);
        assert_eq!(
            selector.select("dancingTeddy", &Registry::default()),
            Err(MaskError::UnregisteredMask("dancingTeddy"))
        );
        assert_eq!(selector.current(), MaskKind::SpiderMan);

        let registry = Registry::with_accessories();
        assert_eq!(
            selector.select("dancingTeddy", &registry),
            Ok(MaskKind::DancingTeddy)
        );
    }

    #[test]
    fn every_face_mask_selectable() {
        let registry = Registry::default();
        let mut selector = MaskSelector::default();
        for kind in MaskKind::FACE_MASKS {
            assert_eq!(selector.select(kind.name(), &registry), Ok(kind));
            assert_eq!(selector.current(), kind);
        }
    }
}
