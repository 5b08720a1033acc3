//! `ic_ecm` XML → [`EcmDocument`].
//!
//! ```text
//! ic_ecm
//!   layer[ID]
//!     patch_collection[type]
//!       patch[ID]
//!         density, orientation, anisotropy
//!         x0, y0, a, b, rotation[units], thickness
//!         interior{...}, shell{...}, exterior{...}
//! ```

use std::path::Path;

use glam::DVec2;
use roxmltree::Node;

use super::model::{EcmDocument, EcmSpec, EcmTarget, Layer, OrientationMode, Patch, PatchCollection, PatchKind};
use super::rotation::parse_rotation;
use crate::error::{EcmError, Result};
use crate::geometry::EllipseGeometry;

/// Document root element name
pub const ROOT_ELEMENT: &str = "ic_ecm";

/// Read and parse an `ic_ecm` file
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<EcmDocument> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let document = parse_document(&contents)?;
    log::info!(
        "Loaded {} layer(s) from {:?}",
        document.layers.len(),
        path.as_ref()
    );
    Ok(document)
}

/// Parse an `ic_ecm` document held in memory
pub fn parse_document(xml: &str) -> Result<EcmDocument> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    if !root.has_tag_name(ROOT_ELEMENT) {
        return Err(EcmError::UnexpectedRoot {
            found: root.tag_name().name().to_string(),
            expected: ROOT_ELEMENT.to_string(),
        });
    }

    let mut layers = Vec::new();
    for node in root.children().filter(Node::is_element) {
        if node.has_tag_name("layer") {
            layers.push(parse_layer(node)?);
        } else {
            log::debug!("Ignoring <{}> under <{}>", node.tag_name().name(), ROOT_ELEMENT);
        }
    }

    // Stable: equal IDs keep document order
    layers.sort_by_key(|layer| layer.id);
    for pair in layers.windows(2) {
        if pair[0].id == pair[1].id {
            log::warn!(
                "Duplicate layer ID {}; layers are applied in document order",
                pair[0].id
            );
        }
    }

    Ok(EcmDocument { layers })
}

fn parse_layer(node: Node) -> Result<Layer> {
    let id_text = node
        .attribute("ID")
        .ok_or_else(|| EcmError::MissingRequiredElement {
            element: "attribute 'ID'".to_string(),
            context: "<layer>".to_string(),
        })?;
    let id = parse_id(id_text, "<layer>")?;

    let mut collections = Vec::new();
    for child in node.children().filter(Node::is_element) {
        if child.has_tag_name("patch_collection") {
            collections.push(parse_collection(child, id)?);
        } else {
            log::debug!("Ignoring <{}> in layer {}", child.tag_name().name(), id);
        }
    }

    Ok(Layer { id, collections })
}

fn parse_collection(node: Node, layer: i64) -> Result<PatchCollection> {
    let type_text = node
        .attribute("type")
        .ok_or_else(|| EcmError::MissingRequiredElement {
            element: "attribute 'type'".to_string(),
            context: format!("<patch_collection> of layer {layer}"),
        })?;
    let kind = PatchKind::parse(type_text).ok_or_else(|| EcmError::UnrecognizedPatchType {
        layer,
        found: type_text.to_string(),
        expected: PatchKind::expected(),
    })?;

    let patches = node
        .children()
        .filter(|n| n.has_tag_name("patch"))
        .enumerate()
        .map(|(index, patch)| parse_patch(patch, kind, layer, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(PatchCollection { kind, patches })
}

fn parse_patch(node: Node, kind: PatchKind, layer: i64, index: usize) -> Result<Patch> {
    let id = match node.attribute("ID") {
        Some(text) => parse_id(text, &format!("layer {layer}, {kind} patch"))?,
        None => index as i64 + 1,
    };
    let context = format!("layer {layer}, {kind} patch {id}");

    let patch = match kind {
        PatchKind::Everywhere => Patch::Everywhere {
            id,
            ecm: parse_ecm(node, EcmTarget::Everywhere, &context)?,
        },
        PatchKind::Ellipse => Patch::Ellipse {
            id,
            geometry: parse_geometry(node, true, &context)?,
            ecm: parse_ecm(node, EcmTarget::Ring, &context)?,
        },
        PatchKind::EllipticalDisc => Patch::EllipticalDisc {
            id,
            geometry: parse_geometry(node, false, &context)?,
            ecm: parse_ecm(node, EcmTarget::Disc, &context)?,
        },
        PatchKind::EllipseWithShell => {
            let geometry = parse_geometry(node, true, &context)?;
            let interior = required_child(node, "interior", &context)?;
            let shell = required_child(node, "shell", &context)?;
            let exterior = child(node, "exterior");
            Patch::EllipseWithShell {
                id,
                geometry,
                interior: parse_ecm(interior, EcmTarget::Interior, &format!("{context} <interior>"))?,
                shell: parse_ecm(shell, EcmTarget::Shell, &format!("{context} <shell>"))?,
                exterior: exterior
                    .map(|n| parse_ecm(n, EcmTarget::Exterior, &format!("{context} <exterior>")))
                    .transpose()?,
            }
        }
    };

    Ok(patch)
}

fn parse_ecm(node: Node, target: EcmTarget, context: &str) -> Result<EcmSpec> {
    let density = required_f64(node, "density", context)?;
    let orientation_text = required_text(node, "orientation", context)?;
    let orientation = OrientationMode::parse(orientation_text)
        .ok_or_else(|| target.orientation_error(orientation_text.trim(), context))?;
    target.require(orientation, context)?;
    let anisotropy = required_f64(node, "anisotropy", context)?;

    Ok(EcmSpec::new(density, orientation, anisotropy))
}

fn parse_geometry(node: Node, with_thickness: bool, context: &str) -> Result<EllipseGeometry> {
    let center = DVec2::new(
        required_f64(node, "x0", context)?,
        required_f64(node, "y0", context)?,
    );
    let semi_axes = DVec2::new(
        required_f64(node, "a", context)?,
        required_f64(node, "b", context)?,
    );

    let rotation_node = required_child(node, "rotation", context)?;
    let rotation = parse_rotation(
        rotation_node.text().unwrap_or(""),
        rotation_node.attribute("units"),
        context,
    )?;

    let thickness = if with_thickness {
        required_f64(node, "thickness", context)?
    } else {
        0.0
    };

    EllipseGeometry::new(center, semi_axes, rotation, thickness).map_err(|e| match e {
        EcmError::InvalidGeometry { reason, .. } => EcmError::InvalidGeometry {
            context: context.to_string(),
            reason,
        },
        other => other,
    })
}

fn parse_id(text: &str, context: &str) -> Result<i64> {
    text.trim().parse::<i64>().map_err(|_| EcmError::InvalidValue {
        element: "ID".to_string(),
        value: text.to_string(),
        context: context.to_string(),
        expected: "an integer".to_string(),
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn required_child<'a, 'input>(node: Node<'a, 'input>, name: &str, context: &str) -> Result<Node<'a, 'input>> {
    child(node, name).ok_or_else(|| EcmError::MissingRequiredElement {
        element: format!("<{name}>"),
        context: context.to_string(),
    })
}

fn required_text<'a>(node: Node<'a, '_>, name: &str, context: &str) -> Result<&'a str> {
    Ok(required_child(node, name, context)?.text().unwrap_or(""))
}

fn required_f64(node: Node, name: &str, context: &str) -> Result<f64> {
    let text = required_text(node, name, context)?.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EcmError::InvalidValue {
            element: name.to_string(),
            value: text.to_string(),
            context: context.to_string(),
            expected: "a finite number".to_string(),
        }),
    }
}
