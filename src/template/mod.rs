//! Example `ic_ecm` documents to start from.
//!
//! Both variants are tuned for a domain around `[-400, 400]²` and composite to
//! full coverage on it.

use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Local;

/// Which example document to scaffold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateVariant {
    /// Random base layer, two fiber rings, a disc on top
    #[default]
    Multilayer,
    /// One ellipse with interior, shell and exterior
    Monolayer,
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateVariant::Multilayer => f.write_str("multilayer"),
            TemplateVariant::Monolayer => f.write_str("monolayer"),
        }
    }
}

const MULTILAYER_BODY: &str = r#"<ic_ecm>
    <!-- Layers are applied in ascending ID order; higher layers overwrite lower ones.
         Patches within one layer must not overlap. -->
    <layer ID="1">
        <patch_collection type="everywhere">
            <patch ID="1">
                <density>0.5</density>
                <orientation>random</orientation>
                <anisotropy>0.2</anisotropy>
            </patch>
        </patch_collection>
    </layer>
    <layer ID="2">
        <!-- ellipse patches fill only the ring of width thickness around the ellipse -->
        <patch_collection type="ellipse">
            <patch ID="1">
                <x0>-200</x0>
                <y0>0</y0>
                <a>100</a>
                <b>60</b>
                <rotation units="degrees">0</rotation>
                <thickness>40</thickness>
                <density>0.9</density>
                <orientation>perpendicular</orientation>
                <anisotropy>0.8</anisotropy>
            </patch>
            <patch ID="2">
                <x0>200</x0>
                <y0>0</y0>
                <a>80</a>
                <b>120</b>
                <rotation>30</rotation>
                <thickness>30</thickness>
                <density>0.9</density>
                <orientation>parallel</orientation>
                <anisotropy>0.8</anisotropy>
            </patch>
        </patch_collection>
    </layer>
    <layer ID="3">
        <patch_collection type="elliptical_disc">
            <patch ID="1">
                <x0>0</x0>
                <y0>250</y0>
                <a>60</a>
                <b>40</b>
                <rotation units="radians">pi/4</rotation>
                <density>0.1</density>
                <orientation>random</orientation>
                <anisotropy>0.0</anisotropy>
            </patch>
        </patch_collection>
    </layer>
</ic_ecm>
"#;

const MONOLAYER_BODY: &str = r#"<ic_ecm>
    <!-- An exterior block defines every voxel outside the shell, so this patch
         must be the only one in its layer. -->
    <layer ID="1">
        <patch_collection type="ellipse_with_shell">
            <patch ID="1">
                <x0>0</x0>
                <y0>0</y0>
                <a>150</a>
                <b>100</b>
                <rotation>0</rotation>
                <thickness>50</thickness>
                <interior>
                    <density>0.1</density>
                    <orientation>random</orientation>
                    <anisotropy>0.0</anisotropy>
                </interior>
                <shell>
                    <density>0.8</density>
                    <orientation>parallel</orientation>
                    <anisotropy>0.9</anisotropy>
                </shell>
                <exterior>
                    <density>0.4</density>
                    <orientation>random</orientation>
                    <anisotropy>0.2</anisotropy>
                </exterior>
            </patch>
        </patch_collection>
    </layer>
</ic_ecm>
"#;

/// Full document text for a variant, stamped with the generation time
pub fn template_document(variant: TemplateVariant) -> String {
    let body = match variant {
        TemplateVariant::Multilayer => MULTILAYER_BODY,
        TemplateVariant::Monolayer => MONOLAYER_BODY,
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- {variant} ECM initial conditions template, generated {} -->\n{body}",
        Local::now().to_rfc3339()
    )
}

/// Write a template document to `path`
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn write_template(path: &Path, variant: TemplateVariant, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating directory {}", dir.display()))?;
    }

    std::fs::write(path, template_document(variant))
        .with_context(|| format!("writing template {}", path.display()))?;
    log::info!("Wrote {variant} template to {}", path.display());
    Ok(())
}
