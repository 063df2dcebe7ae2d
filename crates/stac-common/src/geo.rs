use geojson::{Geometry, Value};

/// A longitude/latitude pair in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// GeoJSON position; missing ordinates read as `None`.
    fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lng, lat, ..] => Some(Self::new(*lng, *lat)),
            _ => None,
        }
    }
}

/// Rectangular extent used to scope item queries: west, south, east, north.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BBox {
    pub const WORLD: BBox = BBox {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    pub fn is_world(&self) -> bool {
        *self == Self::WORLD
    }

    /// Clamp to valid lng/lat ranges, so a zoomed-out map view can be sent
    /// to the server as-is.
    pub fn clamped(self) -> Self {
        Self {
            west: self.west.clamp(-180.0, 180.0),
            south: self.south.clamp(-90.0, 90.0),
            east: self.east.clamp(-180.0, 180.0),
            north: self.north.clamp(-90.0, 90.0),
        }
    }

    /// `w,s,e,n` as the `bbox` query parameter expects.
    pub fn to_param(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::WORLD
    }
}

/// Growable bounds accumulator. Starts empty; `extend` with each coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min: LngLat,
    max: LngLat,
    empty: bool,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            min: LngLat::new(f64::INFINITY, f64::INFINITY),
            max: LngLat::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn extend(&mut self, p: LngLat) {
        self.min.lng = self.min.lng.min(p.lng);
        self.min.lat = self.min.lat.min(p.lat);
        self.max.lng = self.max.lng.max(p.lng);
        self.max.lat = self.max.lat.max(p.lat);
        self.empty = false;
    }

    /// Midpoint of the envelope. `None` for empty bounds.
    pub fn center(&self) -> Option<LngLat> {
        if self.empty {
            return None;
        }
        Some(LngLat::new(
            (self.min.lng + self.max.lng) / 2.0,
            (self.min.lat + self.max.lat) / 2.0,
        ))
    }

    pub fn to_bbox(&self) -> Option<BBox> {
        if self.empty {
            return None;
        }
        Some(BBox::new(
            self.min.lng,
            self.min.lat,
            self.max.lng,
            self.max.lat,
        ))
    }

    /// Envelope of every coordinate in a geometry; empty if it has none.
    pub fn of_geometry(geometry: &Geometry) -> Self {
        let mut bounds = Self::empty();
        bounds.extend_value(&geometry.value);
        bounds
    }

    fn extend_positions<'a>(&mut self, positions: impl IntoIterator<Item = &'a Vec<f64>>) {
        for position in positions {
            if let Some(p) = LngLat::from_position(position) {
                self.extend(p);
            }
        }
    }

    fn extend_value(&mut self, value: &Value) {
        match value {
            Value::Point(p) => self.extend_positions(std::iter::once(p)),
            Value::MultiPoint(points) | Value::LineString(points) => self.extend_positions(points),
            Value::MultiLineString(lines) | Value::Polygon(lines) => {
                for ring in lines {
                    self.extend_positions(ring);
                }
            }
            Value::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    self.extend_positions(ring);
                }
            }
            Value::GeometryCollection(members) => {
                for member in members {
                    self.extend_value(&member.value);
                }
            }
        }
    }
}

/// Where a marker for a geometry goes and how the map should focus on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// A point geometry: fly to it.
    Point(LngLat),
    /// An area geometry: fit its envelope; the marker sits at the center.
    Area { center: LngLat, bbox: BBox },
}

impl Anchor {
    pub fn position(&self) -> LngLat {
        match self {
            Anchor::Point(p) => *p,
            Anchor::Area { center, .. } => *center,
        }
    }

    /// `None` for geometries without any usable coordinate.
    pub fn of_geometry(geometry: &Geometry) -> Option<Self> {
        if let Value::Point(position) = &geometry.value {
            return LngLat::from_position(position).map(Anchor::Point);
        }
        let bounds = Bounds::of_geometry(geometry);
        Some(Anchor::Area {
            center: bounds.center()?,
            bbox: bounds.to_bbox()?,
        })
    }
}
