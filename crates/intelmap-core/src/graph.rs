//! Entity/connection graph construction.
//!
//! Placement rules:
//!
//! - Persons sit on the report's first home-context address. No resolved
//!   home address, no person nodes.
//! - Addresses sit on their own geocoded postcode.
//! - Vehicles have no location of their own and are offset from the primary
//!   (first aggregated) person's node.
//! - Airports come from the reference lookup and are placed once per code.
//!
//! Every connection starts at the primary person, except the airport to
//! airport `Flight <code>` edge. Edges are only drawn between placed nodes.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::aggregate::AggregatedSet;
use crate::arc::great_circle_arc;
use crate::config::PipelineConfig;
use crate::icons::{Icon, IconCatalogue};
use crate::model::{AddressContext, AddressMention, Entry, LatLng, Report, ReportHeader};
use crate::reference::ReferencePlace;

static RE_OFFENCE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"in\s+(\d{4})").unwrap());

pub type EntityId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Person,
    Address,
    Vehicle,
    Airport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Address,
    Vehicle,
    Travel,
    Flight,
}

/// A named property value shown on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Everything needed to place a node on the map surface.
#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub kind: EntityKind,
    pub coordinates: LatLng,
    pub icon: Icon,
    pub label: String,
    pub sub_label: String,
    pub notes: String,
    /// Chart entity type, e.g. `Person`, `Crime Scene`.
    pub entity_type: String,
    pub attributes: Vec<Attribute>,
}

/// A node accepted by the map surface.
#[derive(Debug, Clone, Serialize)]
pub struct GraphEntity {
    pub id: EntityId,
    #[serde(flatten)]
    pub placement: Placement,
}

#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    pub from_entity_id: EntityId,
    pub to_entity_id: EntityId,
    pub kind: ConnectionKind,
    pub label: String,
    pub from_label: String,
    pub to_label: String,
    pub hover_detail: String,
}

/// A sampled great-circle path between two airports.
#[derive(Debug, Clone, Serialize)]
pub struct FlightArc {
    pub code: String,
    pub from_label: String,
    pub to_label: String,
    pub date: Option<String>,
    pub points: Vec<LatLng>,
    pub tooltip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub entries: usize,
    pub persons: usize,
    pub addresses: usize,
    pub vehicles: usize,
    pub flights: usize,
    pub airports: usize,
    pub connections: usize,
    pub phones: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphOutput {
    pub entities: Vec<GraphEntity>,
    pub connections: Vec<Connection>,
    pub arcs: Vec<FlightArc>,
    pub stats: GraphStats,
}

impl GraphOutput {
    /// South-west and north-east corners enclosing every placed node.
    pub fn bounds(&self) -> Option<(LatLng, LatLng)> {
        let mut coords = self.entities.iter().map(|e| e.placement.coordinates);
        let first = coords.next()?;
        Some(coords.fold((first, first), |(sw, ne), p| {
            (
                LatLng::new(sw.lat.min(p.lat), sw.lng.min(p.lng)),
                LatLng::new(ne.lat.max(p.lat), ne.lng.max(p.lng)),
            )
        }))
    }
}

/// The rendering layer the graph is drawn onto.
pub trait MapSurface {
    /// Place a node. `None` means the surface declined it.
    fn place_entity(&mut self, placement: &Placement) -> Option<EntityId>;

    fn add_connection(&mut self, from: LatLng, to: LatLng, connection: &Connection);

    fn add_arc(&mut self, _arc: &FlightArc) {}
}

/// A surface that accepts everything and hands out `E1`, `E2`, ... ids.
/// Useful when the graph is consumed from [`GraphOutput`] alone.
#[derive(Debug, Default)]
pub struct SequentialSurface {
    next: usize,
}

impl MapSurface for SequentialSurface {
    fn place_entity(&mut self, _placement: &Placement) -> Option<EntityId> {
        self.next += 1;
        Some(format!("E{}", self.next))
    }

    fn add_connection(&mut self, _from: LatLng, _to: LatLng, _connection: &Connection) {}
}

#[derive(Debug, Clone)]
struct Node {
    id: EntityId,
    coords: LatLng,
}

/// Builds the graph for one report from its aggregated entities and resolved coordinates.
pub struct GraphBuilder<'a> {
    pub report: &'a Report,
    pub aggregated: &'a AggregatedSet,
    /// Normalised postcode → coordinates.
    pub coordinates: &'a HashMap<String, LatLng>,
    /// IATA code → airport, for the codes this report mentions.
    pub airports: &'a HashMap<String, ReferencePlace>,
    pub icons: &'a dyn IconCatalogue,
    pub config: &'a PipelineConfig,
}

impl GraphBuilder<'_> {
    pub fn build(&self, surface: &mut dyn MapSurface) -> GraphOutput {
        let mut out = GraphOutput {
            stats: GraphStats {
                entries: self.report.entries.len(),
                phones: self.aggregated.phones.len(),
                ..GraphStats::default()
            },
            ..GraphOutput::default()
        };

        let primary = self.place_persons(surface, &mut out);
        let addresses = self.place_addresses(surface, &mut out);
        let vehicles = self.place_vehicles(primary.as_ref(), surface, &mut out);
        let airports = self.place_flights(surface, &mut out);

        if let (Some(person), Some(primary_person)) = (&primary, self.aggregated.primary_person()) {
            self.connect_primary(
                person,
                &primary_person.full_name,
                &addresses,
                &vehicles,
                &airports,
                surface,
                &mut out,
            );
        }

        tracing::info!(
            entities = out.entities.len(),
            connections = out.connections.len(),
            arcs = out.arcs.len(),
            "graph built"
        );
        out
    }

    /// Places every person; returns the primary person's node.
    fn place_persons(&self, surface: &mut dyn MapSurface, out: &mut GraphOutput) -> Option<Node> {
        let home = self.aggregated.home_address()?;
        let coords = *self.coordinates.get(&home.normalised)?;
        let header = &self.report.header;

        let mut notes = format!("{} | {}", header.report_id, header.operation_name);
        if !self.report.provenance.is_empty() {
            notes.push('\n');
            notes.push_str(&self.report.provenance);
        }

        let mut primary = None;
        for (i, person) in self.aggregated.persons.iter().enumerate() {
            let mut attributes = vec![Attribute::new("Full Name", &person.full_name)];
            if let Some(dob) = &person.dob {
                attributes.push(Attribute::new("Date of Birth", dob));
            }
            attributes.extend(self.report_wide_attributes());

            let placement = Placement {
                kind: EntityKind::Person,
                coordinates: coords,
                icon: self.icons.lookup("people", "person", &person.full_name),
                label: person.full_name.clone(),
                sub_label: home.full.clone(),
                notes: notes.clone(),
                entity_type: "Person".into(),
                attributes,
            };
            if let Some(node) = place(surface, out, placement) {
                out.stats.persons += 1;
                if i == 0 {
                    primary = Some(node);
                }
            }
        }
        primary
    }

    /// Phones, PNC IDs, VRMs, and passports are not tied to a person in the
    /// source text, so every person node carries all of them.
    fn report_wide_attributes(&self) -> Vec<Attribute> {
        let agg = self.aggregated;
        let mut attributes = Vec::new();
        for phone in &agg.phones {
            attributes.push(Attribute::new("Phone", phone));
        }
        for pnc in &agg.pnc_ids {
            attributes.push(Attribute::new("PNC ID", pnc));
        }
        for vehicle in &agg.vehicles {
            attributes.push(Attribute::new("VRM", &vehicle.vrm));
        }
        for passport in &agg.passports {
            let value = match &passport.nationality {
                Some(nat) => format!("{} ({})", passport.number, nat.trim()),
                None => passport.number.clone(),
            };
            attributes.push(Attribute::new("Passport", value));
            if let Some(expiry) = &passport.expiry {
                attributes.push(Attribute::new("Passport Expiry", expiry));
            }
        }
        if !self.report.provenance.is_empty() {
            attributes.push(Attribute::new("Provenance", &self.report.provenance));
        }
        attributes.push(Attribute::new("Intel Ref", self.report.header.reference()));
        attributes
    }

    fn place_addresses(
        &self,
        surface: &mut dyn MapSurface,
        out: &mut GraphOutput,
    ) -> HashMap<String, Node> {
        let mut placed = HashMap::new();
        for address in &self.aggregated.addresses {
            let Some(&coords) = self.coordinates.get(&address.normalised) else {
                continue;
            };
            if let Some(node) = place(surface, out, self.address_placement(address, coords)) {
                out.stats.addresses += 1;
                placed.insert(address.normalised.clone(), node);
            }
        }
        placed
    }

    fn address_placement(&self, address: &AddressMention, coords: LatLng) -> Placement {
        let mentioning: Vec<&Entry> = self
            .report
            .entries
            .iter()
            .filter(|e| {
                e.extracted
                    .addresses
                    .iter()
                    .any(|a| a.normalised == address.normalised)
            })
            .collect();

        let mut attributes = vec![Attribute::new("Address", &address.full)];
        let (label, notes, icon, entity_type) = match address.context {
            AddressContext::Offence => {
                let offence = mentioning
                    .iter()
                    .find_map(|e| e.extracted.offence_type.as_deref());
                for entry in &mentioning {
                    if let Some(year) = RE_OFFENCE_YEAR.captures(&entry.text) {
                        attributes.push(Attribute::new("Offence Date", format!("01/01/{}", &year[1])));
                        attributes.push(Attribute::new("Offence Type", offence.unwrap_or("Unknown")));
                    }
                }
                let label = match offence {
                    Some(o) => format!("Offence: {}", title_case(o)),
                    None => "Offence: Location".to_string(),
                };
                let notes = format!("Offence: {}", title_case(offence.unwrap_or("unknown")));
                let mut icon = self.icons.lookup("military", "mil_intel", &label);
                icon.category_name = "Crime Scene".into();
                (label, notes, icon, "Crime Scene")
            }
            AddressContext::Home => {
                let label = "Residential Address".to_string();
                let icon = self.icons.lookup("buildings", "house", &label);
                (label, String::new(), icon, "Address")
            }
            AddressContext::Other => {
                let label = "Address".to_string();
                let icon = self.icons.lookup("buildings", "building", &label);
                (label, String::new(), icon, "Address")
            }
        };
        attributes.push(Attribute::new("Intel Ref", self.report.header.reference()));

        Placement {
            kind: EntityKind::Address,
            coordinates: coords,
            icon,
            label: format!("{label} - {}", address.full),
            sub_label: address.full.clone(),
            notes,
            entity_type: entity_type.into(),
            attributes,
        }
    }

    fn place_vehicles(
        &self,
        primary: Option<&Node>,
        surface: &mut dyn MapSurface,
        out: &mut GraphOutput,
    ) -> HashMap<String, Node> {
        let mut placed = HashMap::new();
        let Some(primary) = primary else {
            return placed;
        };
        let coords = primary.coords.offset(self.config.vehicle_offset_deg);

        for vehicle in &self.aggregated.vehicles {
            let mut attributes = vec![Attribute::new("VRM", &vehicle.vrm)];
            if let Some(since) = &vehicle.since {
                attributes.push(Attribute::new("Registered Since", since));
            }
            attributes.push(Attribute::new("Intel Ref", self.report.header.reference()));

            let placement = Placement {
                kind: EntityKind::Vehicle,
                coordinates: coords,
                icon: self
                    .icons
                    .lookup("vehicles", "car", &format!("Vehicle {}", vehicle.vrm)),
                label: format!("Vehicle: {}", vehicle.vrm),
                sub_label: String::new(),
                notes: vehicle
                    .since
                    .as_ref()
                    .map(|s| format!("Registered keeper since {s}"))
                    .unwrap_or_default(),
                entity_type: "Vehicle".into(),
                attributes,
            };
            if let Some(node) = place(surface, out, placement) {
                out.stats.vehicles += 1;
                placed.insert(vehicle.vrm.clone(), node);
            }
        }
        placed
    }

    /// Places airports, draws flight arcs and airport-to-airport edges.
    fn place_flights(
        &self,
        surface: &mut dyn MapSurface,
        out: &mut GraphOutput,
    ) -> HashMap<String, Node> {
        let mut placed: HashMap<String, Node> = HashMap::new();

        for flight in &self.aggregated.flights {
            let origin = flight.origin.as_deref().and_then(|c| self.airports.get(c));
            let destination = flight
                .destination
                .as_deref()
                .and_then(|c| self.airports.get(c));

            for (airport, direction) in [(origin, "Departure"), (destination, "Arrival")] {
                let Some(airport) = airport else { continue };
                if placed.contains_key(&airport.code) {
                    continue;
                }
                let mut attributes = vec![
                    Attribute::new("IATA", &airport.code),
                    Attribute::new("Airport", &airport.name),
                ];
                if let Some(date) = &flight.date {
                    attributes.push(Attribute::new("Flight Date", date));
                }
                let placement = Placement {
                    kind: EntityKind::Airport,
                    coordinates: airport.coordinates,
                    icon: self.icons.lookup("aviation", "airport", &airport.name),
                    label: airport_label(airport),
                    sub_label: String::new(),
                    notes: format!("{direction} - Flight {}", flight.code),
                    entity_type: "Airport".into(),
                    attributes,
                };
                if let Some(node) = place(surface, out, placement) {
                    out.stats.airports += 1;
                    placed.insert(airport.code.clone(), node);
                }
            }

            let (Some(origin), Some(destination)) = (origin, destination) else {
                continue;
            };
            let entry = self.first_entry(&self.aggregated.flight_entry, &flight.code);

            let mut tooltip = format!(
                "Flight {}\n{} → {}",
                flight.code, origin.name, destination.name
            );
            if let Some(date) = &flight.date {
                tooltip.push('\n');
                tooltip.push_str(date);
            }
            if let Some(badges) = entry.and_then(badges) {
                tooltip.push('\n');
                tooltip.push_str(&badges);
            }
            let arc = FlightArc {
                code: flight.code.clone(),
                from_label: airport_label(origin),
                to_label: airport_label(destination),
                date: flight.date.clone(),
                points: great_circle_arc(
                    origin.coordinates,
                    destination.coordinates,
                    self.config.arc_segments,
                ),
                tooltip,
            };
            surface.add_arc(&arc);
            out.arcs.push(arc);

            if let (Some(from), Some(to)) = (placed.get(&origin.code), placed.get(&destination.code))
            {
                let hover = match entry {
                    Some(e) => self.hover(e),
                    None => format!("Flight {}", flight.code),
                };
                let connection = Connection {
                    from_entity_id: from.id.clone(),
                    to_entity_id: to.id.clone(),
                    kind: ConnectionKind::Flight,
                    label: format!("Flight {}", flight.code),
                    from_label: airport_label(origin),
                    to_label: airport_label(destination),
                    hover_detail: hover,
                };
                connect(surface, out, from.coords, to.coords, connection);
            }
            out.stats.flights += 1;
        }
        placed
    }

    #[allow(clippy::too_many_arguments)]
    fn connect_primary(
        &self,
        person: &Node,
        person_name: &str,
        addresses: &HashMap<String, Node>,
        vehicles: &HashMap<String, Node>,
        airports: &HashMap<String, Node>,
        surface: &mut dyn MapSurface,
        out: &mut GraphOutput,
    ) {
        let agg = self.aggregated;
        let edge = |to: &Node, kind, label: String, to_label: String, entry: Option<&Entry>| {
            Connection {
                from_entity_id: person.id.clone(),
                to_entity_id: to.id.clone(),
                kind,
                label,
                from_label: person_name.to_string(),
                to_label,
                hover_detail: entry.map(|e| self.hover(e)).unwrap_or_default(),
            }
        };

        for address in &agg.addresses {
            let Some(node) = addresses.get(&address.normalised) else {
                continue;
            };
            let label = match address.context {
                AddressContext::Home => "Resides at",
                AddressContext::Offence => "Offence location",
                AddressContext::Other => "Associated address",
            };
            let entry = self.first_entry(&agg.address_entry, &address.normalised);
            let connection = edge(
                node,
                ConnectionKind::Address,
                label.to_string(),
                address.full.clone(),
                entry,
            );
            connect(surface, out, person.coords, node.coords, connection);
        }

        for vehicle in &agg.vehicles {
            let Some(node) = vehicles.get(&vehicle.vrm) else {
                continue;
            };
            let entry = self.first_entry(&agg.vehicle_entry, &vehicle.vrm);
            let connection = edge(
                node,
                ConnectionKind::Vehicle,
                format!("Reg. keeper: {}", vehicle.vrm),
                vehicle.vrm.clone(),
                entry,
            );
            connect(surface, out, person.coords, node.coords, connection);
        }

        for flight in &agg.flights {
            let Some(code) = flight.destination.as_deref() else {
                continue;
            };
            let Some(node) = airports.get(code) else {
                continue;
            };
            let to_label = self
                .airports
                .get(code)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| code.to_string());
            let entry = self.first_entry(&agg.flight_entry, &flight.code);
            let connection = edge(
                node,
                ConnectionKind::Travel,
                format!("Travelled: {}", flight.code),
                to_label,
                entry,
            );
            connect(surface, out, person.coords, node.coords, connection);
        }
    }

    fn first_entry(&self, lookup: &HashMap<String, usize>, key: &str) -> Option<&Entry> {
        lookup.get(key).and_then(|&pos| self.report.entries.get(pos))
    }

    fn hover(&self, entry: &Entry) -> String {
        connection_hover(entry, &self.report.header, self.config.hover_excerpt_len)
    }
}

fn place(surface: &mut dyn MapSurface, out: &mut GraphOutput, placement: Placement) -> Option<Node> {
    let id = surface.place_entity(&placement)?;
    let node = Node {
        id: id.clone(),
        coords: placement.coordinates,
    };
    out.entities.push(GraphEntity { id, placement });
    Some(node)
}

fn connect(
    surface: &mut dyn MapSurface,
    out: &mut GraphOutput,
    from: LatLng,
    to: LatLng,
    connection: Connection,
) {
    surface.add_connection(from, to, &connection);
    out.connections.push(connection);
    out.stats.connections += 1;
}

fn airport_label(airport: &ReferencePlace) -> String {
    format!("{} ({})", airport.name, airport.code)
}

/// `[source] [grading]` for whichever of the two the entry carries.
fn badges(entry: &Entry) -> Option<String> {
    let source = entry.extracted.source.as_ref().map(|s| format!("[{s}]"));
    let grading = entry.extracted.grading.map(|g| format!("[{}]", g.code()));
    let parts: Vec<String> = source.into_iter().chain(grading).collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Hover text for an edge: badges, the entry excerpt, and the report reference.
pub fn connection_hover(entry: &Entry, header: &ReportHeader, excerpt_len: usize) -> String {
    let mut lines = Vec::with_capacity(3);
    if let Some(b) = badges(entry) {
        lines.push(b);
    }
    lines.push(truncate(&entry.text, excerpt_len));
    lines.push(header.reference());
    lines.join("\n")
}

/// Keep the first `max` characters, appending `...` when anything was cut.
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

/// Lowercase everything, then capitalise the first letter of each word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = !is_word;
    }
    out
}
