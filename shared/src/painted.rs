use std::collections::HashMap;

use crate::colors::Rgb;
use crate::country::CountryId;

/// Fill used between binding and the first repaint.
pub const UNPAINTED: Rgb = Rgb(0xcc, 0xcc, 0xcc);

/// Everything the surface needs to draw one country.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePaint {
    pub id: CountryId,
    pub name: String,
    /// SVG path data in projected, untransformed coordinates.
    pub path: String,
    pub fill: Rgb,
    pub tooltip: String,
    pub highlight: Option<Rgb>,
}

impl ShapePaint {
    /// Highlight wins over the choropleth fill.
    pub fn visible_fill(&self) -> Rgb {
        self.highlight.unwrap_or(self.fill)
    }
}

/// Retained paint state for every bound shape, in topology order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaintedMap {
    shapes: Vec<ShapePaint>,
    by_id: HashMap<CountryId, usize>,
    highlighted: Vec<CountryId>,
}

impl PaintedMap {
    /// Bind a shape. Returns `false` (and keeps the first) if `id` is taken.
    pub fn bind(&mut self, id: CountryId, name: String, path: String) -> bool {
        if self.by_id.contains_key(&id) {
            return false;
        }
        self.by_id.insert(id.clone(), self.shapes.len());
        self.shapes.push(ShapePaint {
            id,
            name,
            path,
            fill: UNPAINTED,
            tooltip: String::new(),
            highlight: None,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[ShapePaint] {
        &self.shapes
    }

    pub(crate) fn shapes_mut(&mut self) -> &mut [ShapePaint] {
        &mut self.shapes
    }

    pub fn get(&self, id: &str) -> Option<&ShapePaint> {
        self.by_id.get(id).map(|&i| &self.shapes[i])
    }

    pub fn clear_highlights(&mut self) {
        for shape in &mut self.shapes {
            shape.highlight = None;
        }
        self.highlighted.clear();
    }

    /// Mark `id` as selected. Unknown ids are skipped.
    pub fn set_highlight(&mut self, id: &CountryId, color: Rgb) -> bool {
        let Some(&i) = self.by_id.get(id) else {
            return false;
        };
        self.shapes[i].highlight = Some(color);
        self.highlighted.push(id.clone());
        true
    }

    /// Highlighted shapes in selection order, for drawing them on top.
    pub fn highlighted(&self) -> impl Iterator<Item = &ShapePaint> {
        self.highlighted.iter().filter_map(|id| self.get(id.as_str()))
    }
}
