//! Console preview for myrtio-model-lights
//!
//! Simulates a small model village on a synthetic clock: a gingerbread house
//! with four switchable lights, a tree whose lights ripple outwards, and a
//! status light that blinks while the broker link is down. Network activity
//! is scripted and fed through the same event queue a firmware would use.

use myrtio_model_lights::{
    BusClient, BusConfig, Channel, ChannelAddress, ConnectivityEvent, ConnectivityState, Duration,
    EffectTimings, Group, InboundMessage, Instant, Interval, Level, LightDriver, LinkPoller,
    LinkStatus, NetworkEvent, NetworkEventQueue, PublishGateway, StateDocument, Switch,
    Transport, config::DEFAULT_STATUS_BLINK_PERIOD, light::LEVEL_MAX, payload::validated,
    state_document::CapacityError,
};

/// Network event queue size
const EVENT_QUEUE_SIZE: usize = 16;

/// Maximum number of subscribed topics
const MAX_TOPICS: usize = 8;

/// Simulation step
const STEP: Duration = Duration::from_millis(10);

/// Simulated run time
const RUN_TIME: Duration = Duration::from_millis(8_000);

const AVAILABLE_TOPIC: &str = "/christmas/available";
const STATE_TOPIC: &str = "/christmas/state";
const ALL_TOPIC: &str = "/christmas/gingerbread/all";
const PORCH_TOPIC: &str = "/christmas/gingerbread/porch";
const CANDLE_TOPIC: &str = "/christmas/gingerbread/candle";
const FIRST_TOPIC: &str = "/christmas/gingerbread/first";
const SECOND_TOPIC: &str = "/christmas/gingerbread/second";
const TREE_TOPIC: &str = "/christmas/tree";

/// Faster than production so the ripple is visible in a short run
const PREVIEW_TIMINGS: EffectTimings = EffectTimings {
    blink: Duration::from_millis(600),
    stagger: Duration::from_millis(150),
};

/// Queue between the simulated network and the main loop
static EVENTS: NetworkEventQueue<EVENT_QUEUE_SIZE> = NetworkEventQueue::new();

/// Driver that prints every pin change
#[derive(Debug, Clone, Copy)]
struct ConsoleDriver {
    name: &'static str,
}

impl LightDriver for ConsoleDriver {
    fn configure(&mut self, address: ChannelAddress) {
        println!("          pin {:>2} configured ({})", address.pin, self.name);
    }

    fn write(&mut self, address: ChannelAddress, level: Level) {
        println!(
            "          pin {:>2} {:<8} -> {:>3}%",
            address.pin, self.name, level
        );
    }
}

/// Transport that prints what would go over the wire
#[derive(Debug, Default)]
struct ConsoleTransport;

impl Transport for ConsoleTransport {
    fn subscribe(&mut self, topic: &str) {
        println!("          SUB  {topic}");
    }

    fn publish(&mut self, topic: &str, payload: &str, retain: bool) {
        let retained = if retain { " (retained)" } else { "" };
        println!("          PUB  {topic} {payload}{retained}");
    }

    fn set_last_will(&mut self, topic: &str, payload: &str, retain: bool) {
        println!("          LWT  {topic} {payload} retain={retain}");
    }
}

type Gateway = PublishGateway<ConsoleTransport>;

/// Light state of the whole village
struct Village {
    porch: Channel<ConsoleDriver>,
    candle: Channel<ConsoleDriver>,
    first: Channel<ConsoleDriver>,
    second: Channel<ConsoleDriver>,
    tree: Group<ConsoleDriver>,
    tree_on: Switch,
}

impl Village {
    fn new() -> Self {
        let channel = |pin, name| Channel::new(ChannelAddress::gpio(pin), ConsoleDriver { name });
        let dimmable =
            |pin, lane, name| Channel::new(ChannelAddress::pwm(pin, lane), ConsoleDriver { name });
        Self {
            porch: channel(16, "porch"),
            candle: channel(17, "candle"),
            first: channel(18, "first"),
            second: channel(19, "second"),
            tree: Group::new(
                dimmable(23, 0, "tree-in"),
                dimmable(22, 1, "tree-mid"),
                dimmable(21, 2, "tree-out"),
            ),
            tree_on: Switch::Off,
        }
    }

    fn configure(&mut self) {
        for channel in self.house_mut() {
            channel.configure();
        }
        self.tree.configure();
    }

    fn house_mut(&mut self) -> [&mut Channel<ConsoleDriver>; 4] {
        [
            &mut self.porch,
            &mut self.candle,
            &mut self.first,
            &mut self.second,
        ]
    }

    fn set_tree(&mut self, switch: Switch) {
        self.tree_on = switch;
        if switch.is_on() {
            self.tree.start_sequence(
                PREVIEW_TIMINGS.blink,
                PREVIEW_TIMINGS.stagger,
                LEVEL_MAX,
                0,
            );
        } else {
            self.tree.off();
        }
    }

    fn tick(&mut self, now: Instant) {
        self.tree.tick(now);
    }

    fn state_document(&self) -> Result<String, CapacityError> {
        let switch = |channel: &Channel<ConsoleDriver>| Switch::from(channel.is_on());
        let mut doc = StateDocument::<128>::new();
        doc.token("porch", switch(&self.porch))?
            .token("candle", switch(&self.candle))?
            .token("first", switch(&self.first))?
            .token("second", switch(&self.second))?
            .token("tree", self.tree_on)?;
        doc.finish().map(|state| state.as_str().to_owned())
    }

    fn publish_state(&self, gateway: &mut Gateway) {
        match self.state_document() {
            Ok(state) => gateway.publish(STATE_TOPIC, &state, true),
            Err(CapacityError) => println!("          state document overflow"),
        }
    }
}

/// Apply a switch payload to `channel`; returns `false` for invalid payloads
fn set_switch(channel: &mut Channel<ConsoleDriver>, payload: &str) -> bool {
    let Some(switch) = validated::<Switch>(payload) else {
        return false;
    };
    if switch.is_on() {
        channel.on(LEVEL_MAX);
    } else {
        channel.off();
    }
    true
}

fn register_topics(
    client: &mut BusClient<'static, Village, ConsoleTransport, MAX_TOPICS>,
) -> Result<(), myrtio_model_lights::bus::RegistryFull> {
    client
        .subscribe(ALL_TOPIC, |village, payload, gateway| {
            if validated::<Switch>(payload).is_none() {
                return;
            }
            for channel in village.house_mut() {
                set_switch(channel, payload);
            }
            village.publish_state(gateway);
        })?
        .subscribe(PORCH_TOPIC, |village, payload, gateway| {
            if set_switch(&mut village.porch, payload) {
                village.publish_state(gateway);
            }
        })?
        .subscribe(CANDLE_TOPIC, |village, payload, gateway| {
            if set_switch(&mut village.candle, payload) {
                village.publish_state(gateway);
            }
        })?
        .subscribe(FIRST_TOPIC, |village, payload, gateway| {
            if set_switch(&mut village.first, payload) {
                village.publish_state(gateway);
            }
        })?
        .subscribe(SECOND_TOPIC, |village, payload, gateway| {
            if set_switch(&mut village.second, payload) {
                village.publish_state(gateway);
            }
        })?
        .subscribe(TREE_TOPIC, |village, payload, gateway| {
            let Some(switch) = validated::<Switch>(payload) else {
                return;
            };
            village.set_tree(switch);
            village.publish_state(gateway);
        })?
        .on_connectivity_change(on_connectivity_change);
    Ok(())
}

fn on_connectivity_change(village: &mut Village, flags: ConnectivityState, gateway: &mut Gateway) {
    println!(
        "          link={} address={} session={}",
        flags.transport_up, flags.address_assigned, flags.session_up
    );
    if flags.is_fully_connected() {
        village.publish_state(gateway);
    }
}

/// Scripted network activity: (time in ms, event)
fn script() -> Vec<(u64, NetworkEvent)> {
    let message =
        |topic: &str, payload: &str| InboundMessage::new(topic, payload).map(NetworkEvent::from);
    let link = |event: ConnectivityEvent| Some(NetworkEvent::from(event));
    let steps = [
        (300, link(ConnectivityEvent::TransportUp)),
        (500, link(ConnectivityEvent::AddressAssigned)),
        (900, link(ConnectivityEvent::SessionUp)),
        (1_200, message(PORCH_TOPIC, "ON")),
        (1_500, message(TREE_TOPIC, "ON")),
        (1_800, message(CANDLE_TOPIC, "on")),
        (3_000, link(ConnectivityEvent::SessionDown)),
        (3_200, message(ALL_TOPIC, "ON")),
        (4_500, link(ConnectivityEvent::SessionUp)),
        (5_000, message("/christmas/unknown", "ON")),
        (6_000, message(TREE_TOPIC, "OFF")),
        (7_000, link(ConnectivityEvent::TransportDown)),
    ];
    steps
        .into_iter()
        .filter_map(|(at, event)| Some((at, event?)))
        .collect()
}

fn main() {
    let mut village = Village::new();
    village.configure();

    let mut client = BusClient::new(
        ConsoleTransport,
        BusConfig {
            availability_topic: AVAILABLE_TOPIC,
        },
    );
    if let Err(err) = register_topics(&mut client) {
        println!("failed to register topics: {err:?}");
        return;
    }

    let mut status = Channel::new(ChannelAddress::gpio(2), ConsoleDriver { name: "status" });
    let mut status_blink = Interval::new(DEFAULT_STATUS_BLINK_PERIOD);
    let mut poller = LinkPoller::new(Duration::from_millis(500));

    let sender = EVENTS.sender();
    let receiver = EVENTS.receiver();
    let mut script = script().into_iter().peekable();

    let start = Instant::from_ticks(0);
    let mut elapsed = Duration::from_ticks(0);
    while elapsed <= RUN_TIME {
        let now = start + elapsed;
        let t_ms = elapsed.as_millis();

        while let Some((_, event)) = script.next_if(|(at, _)| *at <= t_ms) {
            println!("[{t_ms:>5} ms] <- {event:?}");
            if sender.try_send(event).is_err() {
                println!("[{t_ms:>5} ms] event queue full");
            }
        }
        client.process_pending(&receiver, &mut village);

        match poller.poll(now, client.is_connected()) {
            LinkStatus::Connecting { first } => {
                if first {
                    status_blink.reset();
                }
                if status_blink.elapsed(now) {
                    status.toggle();
                }
            }
            LinkStatus::Connected { first } => {
                if first {
                    status.on(LEVEL_MAX);
                }
            }
        }

        village.tick(now);
        elapsed += STEP;
    }
}
