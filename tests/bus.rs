mod tests {
    use myrtio_model_lights::bus::{BusClient, PublishGateway, RegistryFull, Transport};
    use myrtio_model_lights::connectivity::{ConnectivityEvent, ConnectivityState};
    use myrtio_model_lights::event_queue::{InboundMessage, NetworkEvent, NetworkEventQueue};
    use myrtio_model_lights::payload::{Switch, Token, validated};
    use myrtio_model_lights::{BusConfig, StateDocument};

    const AVAILABLE_TOPIC: &str = "/village/available";
    const STATE_TOPIC: &str = "/village/state";
    const ALL_TOPIC: &str = "/village/all";
    const PORCH_TOPIC: &str = "/village/porch";
    const CANDLE_TOPIC: &str = "/village/candle";

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Published {
        topic: String,
        payload: String,
        retain: bool,
    }

    #[derive(Debug, Default)]
    struct MockTransport {
        subscriptions: Vec<String>,
        published: Vec<Published>,
        last_will: Option<Published>,
    }

    impl Transport for MockTransport {
        fn subscribe(&mut self, topic: &str) {
            self.subscriptions.push(topic.to_string());
        }

        fn publish(&mut self, topic: &str, payload: &str, retain: bool) {
            self.published.push(Published {
                topic: topic.to_string(),
                payload: payload.to_string(),
                retain,
            });
        }

        fn set_last_will(&mut self, topic: &str, payload: &str, retain: bool) {
            self.last_will = Some(Published {
                topic: topic.to_string(),
                payload: payload.to_string(),
                retain,
            });
        }
    }

    #[derive(Debug, Default)]
    struct Village {
        porch: Switch,
        candle: Switch,
        handled: usize,
        flag_reports: Vec<ConnectivityState>,
    }

    impl Village {
        fn publish_state(&self, gateway: &mut PublishGateway<MockTransport>) {
            let mut doc = StateDocument::<64>::new();
            doc.token("porch", self.porch)
                .and_then(|doc| doc.token("candle", self.candle))
                .unwrap();
            gateway.publish(STATE_TOPIC, &doc.finish().unwrap(), true);
        }
    }

    type Client = BusClient<'static, Village, MockTransport, 4>;

    fn set_all(village: &mut Village, payload: &str, gateway: &mut PublishGateway<MockTransport>) {
        village.handled += 1;
        let Some(switch) = validated::<Switch>(payload) else {
            return;
        };
        village.porch = switch;
        village.candle = switch;
        village.publish_state(gateway);
    }

    fn set_porch(village: &mut Village, payload: &str, gateway: &mut PublishGateway<MockTransport>) {
        village.handled += 1;
        let Some(switch) = validated::<Switch>(payload) else {
            return;
        };
        village.porch = switch;
        village.publish_state(gateway);
    }

    fn client() -> Client {
        BusClient::new(
            MockTransport::default(),
            BusConfig {
                availability_topic: AVAILABLE_TOPIC,
            },
        )
    }

    fn connect(client: &mut Client, village: &mut Village) {
        client.report(ConnectivityEvent::TransportUp, village);
        client.report(ConnectivityEvent::AddressAssigned, village);
        client.report(ConnectivityEvent::SessionUp, village);
    }

    fn published(client: &Client) -> &[Published] {
        &client.gateway().transport().published
    }

    #[test]
    fn test_last_will_is_registered_on_creation() {
        let client = client();
        assert_eq!(
            client.gateway().transport().last_will,
            Some(Published {
                topic: AVAILABLE_TOPIC.to_string(),
                payload: "offline".to_string(),
                retain: true,
            })
        );
    }

    #[test]
    fn test_publish_is_dropped_while_disconnected() {
        let mut client = client();
        let mut village = Village::default();
        client.publish(STATE_TOPIC, "{}", true);
        client.report(ConnectivityEvent::TransportUp, &mut village);
        client.report(ConnectivityEvent::AddressAssigned, &mut village);
        client.publish(STATE_TOPIC, "{}", true);
        assert!(published(&client).is_empty());
    }

    #[test]
    fn test_publish_passes_through_when_connected() {
        let mut client = client();
        let mut village = Village::default();
        connect(&mut client, &mut village);
        let before = published(&client).len();

        client.publish(STATE_TOPIC, "{\"porch\":\"ON\"}", false);
        assert_eq!(published(&client).len(), before + 1);
        assert_eq!(
            published(&client).last(),
            Some(&Published {
                topic: STATE_TOPIC.to_string(),
                payload: "{\"porch\":\"ON\"}".to_string(),
                retain: false,
            })
        );
    }

    #[test]
    fn test_connecting_resubscribes_and_announces_online() {
        let mut client = client();
        let mut village = Village::default();
        client.subscribe(ALL_TOPIC, set_all).unwrap();
        client.subscribe(PORCH_TOPIC, set_porch).unwrap();
        assert!(client.gateway().transport().subscriptions.is_empty());

        connect(&mut client, &mut village);
        assert_eq!(
            client.gateway().transport().subscriptions,
            vec![ALL_TOPIC, PORCH_TOPIC]
        );
        assert_eq!(
            published(&client),
            &[Published {
                topic: AVAILABLE_TOPIC.to_string(),
                payload: "online".to_string(),
                retain: true,
            }]
        );
    }

    #[test]
    fn test_every_reconnect_replays_subscriptions_once() {
        let mut client = client();
        let mut village = Village::default();
        client.subscribe(ALL_TOPIC, set_all).unwrap();
        connect(&mut client, &mut village);

        client.report(ConnectivityEvent::SessionDown, &mut village);
        client.report(ConnectivityEvent::SessionDown, &mut village);
        client.report(ConnectivityEvent::SessionUp, &mut village);
        client.report(ConnectivityEvent::SessionUp, &mut village);

        assert_eq!(
            client.gateway().transport().subscriptions,
            vec![ALL_TOPIC, ALL_TOPIC]
        );
    }

    #[test]
    fn test_late_subscription_is_sent_immediately() {
        let mut client = client();
        let mut village = Village::default();
        connect(&mut client, &mut village);

        client.subscribe(CANDLE_TOPIC, set_porch).unwrap();
        assert_eq!(client.gateway().transport().subscriptions, vec![CANDLE_TOPIC]);
    }

    #[test]
    fn test_resubscribing_a_topic_overwrites_the_handler() {
        let mut client = client();
        let mut village = Village::default();
        client.subscribe(PORCH_TOPIC, set_all).unwrap();
        client.subscribe(PORCH_TOPIC, set_porch).unwrap();
        assert_eq!(client.registry().len(), 1);

        client.dispatch(PORCH_TOPIC, "ON", &mut village);
        assert_eq!(village.porch, Switch::On);
        assert_eq!(village.candle, Switch::Off);
    }

    #[test]
    fn test_registry_capacity() {
        let mut client = client();
        client.subscribe("/a", set_all).unwrap();
        client.subscribe("/b", set_all).unwrap();
        client.subscribe("/c", set_all).unwrap();
        client.subscribe("/d", set_all).unwrap();
        assert_eq!(client.subscribe("/e", set_all).err(), Some(RegistryFull));
        // Overwrites still fit
        assert!(client.subscribe("/a", set_porch).is_ok());
    }

    #[test]
    fn test_dispatch_matches_topics_exactly() {
        let mut client = client();
        let mut village = Village::default();
        client.subscribe(ALL_TOPIC, set_all).unwrap();

        assert!(!client.dispatch("/village/ALL", "ON", &mut village));
        assert!(!client.dispatch("/village/all/", "ON", &mut village));
        assert!(!client.dispatch("/village/#", "ON", &mut village));
        assert_eq!(village.handled, 0);

        assert!(client.dispatch(ALL_TOPIC, "ON", &mut village));
        assert_eq!(village.handled, 1);
    }

    #[test]
    fn test_invalid_payload_changes_nothing() {
        let mut client = client();
        let mut village = Village::default();
        client.subscribe(ALL_TOPIC, set_all).unwrap();
        connect(&mut client, &mut village);
        let before = published(&client).len();

        client.dispatch(ALL_TOPIC, "on", &mut village);
        client.dispatch(ALL_TOPIC, "TOGGLE", &mut village);
        assert_eq!(village.porch, Switch::Off);
        assert_eq!(published(&client).len(), before);
    }

    #[test]
    fn test_offline_change_is_published_after_reconnect() {
        let mut client = client();
        let mut village = Village::default();
        client.subscribe(ALL_TOPIC, set_all).unwrap();
        client.on_connectivity_change(|village, flags, gateway| {
            village.flag_reports.push(flags);
            if flags.is_fully_connected() {
                village.publish_state(gateway);
            }
        });

        client.dispatch(ALL_TOPIC, Switch::On.as_str(), &mut village);
        assert_eq!(village.porch, Switch::On);
        assert!(published(&client).is_empty());

        connect(&mut client, &mut village);
        assert_eq!(village.flag_reports.len(), 3);
        assert_eq!(
            published(&client).last(),
            Some(&Published {
                topic: STATE_TOPIC.to_string(),
                payload: "{\"porch\":\"ON\",\"candle\":\"ON\"}".to_string(),
                retain: true,
            })
        );
    }

    #[test]
    fn test_change_handler_only_runs_on_changes() {
        let mut client = client();
        let mut village = Village::default();
        client.on_connectivity_change(|village, flags, _| village.flag_reports.push(flags));

        client.report(ConnectivityEvent::TransportUp, &mut village);
        client.report(ConnectivityEvent::TransportUp, &mut village);
        client.report(ConnectivityEvent::TransportDown, &mut village);
        client.report(ConnectivityEvent::TransportDown, &mut village);
        assert_eq!(village.flag_reports.len(), 2);
    }

    #[test]
    fn test_process_pending_drains_queue_in_order() {
        static EVENTS: NetworkEventQueue<8> = NetworkEventQueue::new();
        let sender = EVENTS.sender();
        let mut client = client();
        let mut village = Village::default();
        client.subscribe(PORCH_TOPIC, set_porch).unwrap();

        sender
            .try_send(InboundMessage::new(PORCH_TOPIC, "ON").unwrap().into())
            .unwrap();
        for event in [
            ConnectivityEvent::TransportUp,
            ConnectivityEvent::AddressAssigned,
            ConnectivityEvent::SessionUp,
        ] {
            sender.try_send(NetworkEvent::from(event)).unwrap();
        }
        sender
            .try_send(InboundMessage::new(PORCH_TOPIC, "OFF").unwrap().into())
            .unwrap();

        let handled = client.process_pending(&EVENTS.receiver(), &mut village);
        assert_eq!(handled, 5);
        assert!(EVENTS.is_empty());
        assert!(client.is_connected());
        assert_eq!(village.porch, Switch::Off);
        assert_eq!(
            published(&client).last().map(|p| p.payload.as_str()),
            Some("{\"porch\":\"OFF\",\"candle\":\"OFF\"}")
        );
    }

    #[test]
    fn test_handle_event_routes_by_kind() {
        let mut client = client();
        let mut village = Village::default();
        client.subscribe(PORCH_TOPIC, set_porch).unwrap();

        let change = client.handle_event(&ConnectivityEvent::TransportUp.into(), &mut village);
        assert!(change.is_some_and(|change| change.current.transport_up));

        let message = InboundMessage::new(PORCH_TOPIC, "ON").unwrap().into();
        assert_eq!(client.handle_event(&message, &mut village), None);
        assert_eq!(village.porch, Switch::On);
        assert_eq!(village.handled, 1);
    }
}
