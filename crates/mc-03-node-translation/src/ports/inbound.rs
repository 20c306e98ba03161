//! Inbound port: what the map builder and admin API ask of translation.

use shared_types::{Machine, MeshResult};

use crate::application::NodeTranslator;
use crate::domain::{MachineView, Node, RoutesView};

/// Machine record conversions.
pub trait NodeTranslationApi: Send + Sync {
    /// Wire descriptor of one machine.
    fn node(&self, machine: &Machine, include_routes: bool) -> MeshResult<Node>;

    /// Wire descriptors of a peer list, in input order.
    fn nodes(&self, machines: &[Machine], include_routes: bool) -> MeshResult<Vec<Node>>;

    /// Administrative view of one machine.
    fn machine_view(&self, machine: &Machine) -> MachineView {
        MachineView::from(machine)
    }

    /// Advertised and enabled routes of one machine.
    fn routes_view(&self, machine: &Machine) -> MeshResult<RoutesView> {
        RoutesView::from_machine(machine)
    }
}

impl NodeTranslationApi for NodeTranslator {
    fn node(&self, machine: &Machine, include_routes: bool) -> MeshResult<Node> {
        self.translate(machine, include_routes)
    }

    fn nodes(&self, machines: &[Machine], include_routes: bool) -> MeshResult<Vec<Node>> {
        self.translate_all(machines, include_routes)
    }
}
