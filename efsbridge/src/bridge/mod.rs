//! The bridge core: lifecycle, event fan-out, and inbound command dispatch.
//!
//! [`Bridge`] owns the [`Host`] capability and is driven entirely by host
//! callbacks: state-change entry points publish normalized events, and the
//! timer tick runs the enable/disable transitions, drains inbound commands,
//! and republishes the self-state on its cadence. There are no background
//! threads; everything happens on the host's callback thread.

mod text_commands;

use std::net::SocketAddr;
use std::time::Instant;

use tracing::{debug, warn};

use crate::commands;
use crate::config::BridgeSettings;
use crate::events;
use crate::host::{
    ControllerSnapshot, FlightPlanSnapshot, Host, HostText, RadarTargetSnapshot, TagDelegate,
};
use crate::network::{CommandListener, EventPublisher};
use crate::protocol::{InboundCommand, OutboundEvent};

pub struct Bridge<H: Host> {
    host: H,
    settings: BridgeSettings,
    /// Operator-visible diagnostics; toggled at runtime by `.efs debug`.
    debug: bool,
    enabled: bool,
    enabled_at: Option<Instant>,
    publisher: EventPublisher,
    /// Bound only while enabled; dropping it closes the socket.
    listener: Option<CommandListener>,
    tag_delegate: Option<Box<dyn TagDelegate>>,
    /// Last reported transport failure, kept to report each failure once.
    last_transport_error: Option<String>,
}

impl<H: Host> Bridge<H> {
    /// Create a disabled bridge; [`on_timer`](Self::on_timer) enables it once
    /// the host reports a live connection.
    pub fn new(host: H, settings: BridgeSettings) -> Self {
        let publisher = EventPublisher::new(settings.outbound_addr);
        let debug = settings.debug;
        Self {
            host,
            settings,
            debug,
            enabled: false,
            enabled_at: None,
            publisher,
            listener: None,
            tag_delegate: None,
            last_transport_error: None,
        }
    }

    /// Register the drawing-surface capability used by squawk and
    /// clearance-flag commands.
    pub fn set_tag_delegate(&mut self, delegate: Box<dyn TagDelegate>) {
        self.tag_delegate = Some(delegate);
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The address the inbound listener bound, while enabled.
    pub fn inbound_local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Timer tick. Runs the lifecycle transitions, drains pending inbound
    /// commands, and republishes the self-state every
    /// `republish_every_ticks` ticks once the warmup has passed.
    pub fn on_timer(&mut self, counter: u64) {
        let connection = self.host.connection_type();
        if !self.enabled && connection.is_live() {
            self.enabled = true;
            self.enabled_at = Some(Instant::now());
            self.debug_message("EFS updates enabled");
            match CommandListener::bind(self.settings.inbound_addr) {
                Ok(listener) => self.listener = Some(listener),
                Err(e) => self
                    .host
                    .display_message(&format!("Failed to open command socket: {e}")),
            }
            self.publish(&events::connection_type_update(connection));
        } else if self.enabled && !connection.is_live() {
            self.enabled = false;
            self.debug_message("EFS updates disabled");
            self.publish(&events::connection_type_update(connection));
            self.listener = None;
            self.enabled_at = None;
            return;
        } else if !self.enabled {
            return;
        }

        self.poll_inbound();

        let warmed_up = self
            .enabled_at
            .is_some_and(|at| at.elapsed() >= self.settings.republish_warmup);
        if !warmed_up {
            return;
        }
        if counter % self.settings.republish_every_ticks == 0 {
            self.update_myself();
        }
    }

    /// Flight-plan data changed on the host.
    pub fn on_flight_plan_data_update(&mut self, fp: &FlightPlanSnapshot) {
        if !self.enabled || !events::passes_filter(fp, &self.settings.filter_prefix) {
            return;
        }
        match events::flight_plan_data_update(fp) {
            Ok(event) => self.publish(&event),
            Err(e) => self.report_normalize_error("flightPlanDataUpdate", &e),
        }
    }

    /// A controller-assigned data field changed; `code` is the host's
    /// sub-type code.
    pub fn on_controller_assigned_data_update(&mut self, fp: &FlightPlanSnapshot, code: i32) {
        if !self.enabled || !events::passes_filter(fp, &self.settings.filter_prefix) {
            return;
        }
        match events::controller_assigned_data_update(fp, code) {
            Ok(event) => self.publish(&event),
            Err(e) => self.report_normalize_error("controllerAssignedDataUpdate", &e),
        }
    }

    /// A flight plan left the host's view.
    pub fn on_flight_plan_disconnect(&mut self, fp: &FlightPlanSnapshot) {
        if !self.enabled || !events::passes_filter(fp, &self.settings.filter_prefix) {
            return;
        }
        let event = events::flight_plan_disconnect(fp);
        self.publish(&event);
    }

    /// A flight strip was pushed between controllers.
    pub fn on_flight_strip_pushed(
        &mut self,
        fp: &FlightPlanSnapshot,
        sender: &HostText,
        target: &HostText,
    ) {
        if !self.enabled || !events::passes_filter(fp, &self.settings.filter_prefix) {
            return;
        }
        let event = events::flight_strip_pushed(fp, sender, target);
        self.publish(&event);
    }

    /// A controller position changed or appeared.
    pub fn on_controller_position_update(&mut self, controller: &ControllerSnapshot) {
        if !self.enabled {
            return;
        }
        let me = self.my_callsign();
        let event = events::controller_position_update(controller, me.as_deref());
        self.publish(&event);
    }

    /// A controller disconnected.
    pub fn on_controller_disconnect(&mut self, controller: &ControllerSnapshot) {
        if !self.enabled {
            return;
        }
        let event = events::controller_disconnect(controller);
        self.publish(&event);
    }

    /// A radar track moved.
    pub fn on_radar_target_position_update(&mut self, target: &RadarTargetSnapshot) {
        if !self.enabled {
            return;
        }
        if let Some(event) = events::radar_target_position_update(target) {
            self.publish(&event);
        }
    }

    /// Republish the full host state: every flight plan's data and assigned
    /// summary, every radar track, every controller.
    ///
    /// The assigned summary goes out for all plans, unfiltered; the external
    /// peer prunes what it does not show.
    pub fn refresh(&mut self) {
        if !self.enabled {
            return;
        }
        for fp in self.host.flight_plans() {
            self.on_flight_plan_data_update(&fp);
            match events::assigned_data_summary(&fp) {
                Ok(event) => self.publish(&event),
                Err(e) => self.report_normalize_error("refresh", &e),
            }
        }
        for target in self.host.radar_targets() {
            self.on_radar_target_position_update(&target);
        }
        for controller in self.host.controllers() {
            self.on_controller_position_update(&controller);
        }
    }

    /// Publish the self-state with the active runway configuration.
    pub fn update_myself(&mut self) {
        let Some(me) = self.host.myself() else {
            self.debug_message("updateMyself: controller not valid");
            return;
        };
        let rwyconfig =
            events::runway_config(&self.host.sector_airports(), &self.host.sector_runways());
        match events::myself_update(&me, rwyconfig, crate::VERSION) {
            Ok(event) => self.publish(&event),
            Err(e) => self.report_normalize_error("updateMyself", &e),
        }
    }

    /// Receive and execute at most one pending inbound command.
    ///
    /// One datagram per tick bounds the work done inside the host's timer
    /// callback; a queue drains across consecutive ticks.
    fn poll_inbound(&mut self) {
        let Some(listener) = &self.listener else {
            return;
        };
        match listener.poll_once() {
            Ok(Some(datagram)) => self.handle_datagram(&datagram),
            Ok(None) => {}
            Err(e) => {
                self.host.display_message(&format!("UDP receive error: {e}"));
            }
        }
    }

    fn handle_datagram(&mut self, datagram: &[u8]) {
        // Anything that isn't a JSON object is peer noise, not a command.
        if datagram.first() != Some(&b'{') {
            return;
        }
        match InboundCommand::parse(datagram) {
            Ok(command) => self.execute_command(&command),
            Err(e) => self.host.display_message(&e.to_string()),
        }
    }

    fn execute_command(&mut self, command: &InboundCommand) {
        // Reborrow the boxed delegate so the borrow ends with the call.
        let tag: Option<&mut dyn TagDelegate> = match self.tag_delegate.as_mut() {
            Some(d) => Some(&mut **d),
            None => None,
        };
        match commands::execute(&mut self.host, tag, command) {
            Ok(reply) => {
                if let Some(info) = &reply.info {
                    self.debug_message(info);
                }
                if let Some(callsign) = &reply.republish {
                    if let Some(fp) = self.host.find_flight_plan(callsign) {
                        self.on_flight_plan_data_update(&fp);
                    }
                }
                if reply.refresh {
                    self.refresh();
                }
            }
            Err(e) => self.host.display_message(&e.to_string()),
        }
    }

    fn publish(&mut self, event: &OutboundEvent) {
        match self.publisher.publish(event) {
            Ok(()) => self.last_transport_error = None,
            Err(e) => {
                let text = e.to_string();
                warn!(event = event.type_name(), error = %text, "publish failed");
                if self.last_transport_error.as_deref() != Some(text.as_str()) {
                    self.host
                        .display_message(&format!("Failed to publish {}: {text}", event.type_name()));
                    self.last_transport_error = Some(text);
                }
            }
        }
    }

    fn report_normalize_error(&mut self, context: &str, error: &events::NormalizeError) {
        if error.reportable() {
            self.host.display_message(&format!("{context}: {error}"));
        } else {
            self.debug_message(&format!("{context}: {error}"));
        }
    }

    fn my_callsign(&self) -> Option<String> {
        self.host
            .myself()
            .map(|me| crate::encoding::to_utf8(me.callsign.as_bytes()))
    }

    /// Show a diagnostic to the operator when debug mode is on; otherwise it
    /// only reaches the trace log.
    fn debug_message(&mut self, text: &str) {
        if self.debug {
            self.host.display_message(text);
        } else {
            debug!("{text}");
        }
    }
}
