//! End-to-end flows through the coordinator with every task wired up

mod common;

use common::{still_sample, MockSensor, MockStrip, NoDelay};
use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use neppi_core::attributes::{AttributeId, AttributeUpdate, BridgeFault, StatusRecord};
use neppi_core::color::{ActuatorCommand, ColorFeedback};
use neppi_core::config::{ActuatorConfig, IntensityLevels, MotionConfig};
use neppi_core::motion::MotionSample;
use neppi_core::state::{DeviceState, Event};
use neppi_core::touch::{TouchReport, TouchState};
use neppi_runtime::{
    ActuatorTask, CoordinatorTask, Delivery, MotionTask, WakeNotice, WirelessBridge,
};

type Events = Channel<NoopRawMutex, Event, 16>;
type Stream = Channel<NoopRawMutex, MotionSample, 2>;
type Commands = Channel<NoopRawMutex, ActuatorCommand, 16>;
type Updates = Channel<NoopRawMutex, AttributeUpdate, 16>;

struct Mailboxes {
    events: Events,
    stream: Stream,
    commands: Commands,
    updates: Updates,
}

impl Mailboxes {
    fn new() -> Self {
        Self {
            events: Events::new(),
            stream: Stream::new(),
            commands: Commands::new(),
            updates: Updates::new(),
        }
    }

    fn coordinator(&self) -> CoordinatorTask<'_> {
        CoordinatorTask::new(
            IntensityLevels::default(),
            self.events.receiver().into(),
            self.stream.receiver().into(),
            self.commands.sender().into(),
            self.updates.sender().into(),
        )
    }

    fn bridge(&self) -> WirelessBridge<'_> {
        WirelessBridge::new(self.events.sender().into(), self.updates.receiver().into())
    }

    fn commands(&self) -> Vec<ActuatorCommand> {
        let mut out = Vec::new();
        while let Ok(command) = self.commands.try_receive() {
            out.push(command);
        }
        out
    }

    fn updates(&self) -> Vec<AttributeUpdate> {
        let mut out = Vec::new();
        while let Ok(update) = self.updates.try_receive() {
            out.push(update);
        }
        out
    }

    fn statuses(&self) -> Vec<StatusRecord> {
        self.updates()
            .iter()
            .filter(|u| u.id == AttributeId::DeviceState)
            .filter_map(|u| StatusRecord::from_bytes(&u.payload))
            .collect()
    }
}

/// Step the coordinator until both of its inboxes are empty
fn pump(task: &mut CoordinatorTask<'_>, boxes: &Mailboxes) -> Result<(), BridgeFault> {
    block_on(async {
        while !boxes.events.is_empty() || !boxes.stream.is_empty() {
            task.step().await?;
        }
        Ok::<(), BridgeFault>(())
    })
}

fn touch(state: TouchState, sample: u32) -> Event {
    Event::Touch(TouchReport { state, sample })
}

#[test]
fn test_boot_enters_off() {
    let boxes = Mailboxes::new();
    let mut task = boxes.coordinator();

    block_on(task.start()).unwrap();

    assert_eq!(task.state(), DeviceState::Off);
    assert_eq!(
        boxes.commands(),
        vec![
            ActuatorCommand::SetRecording(false),
            ActuatorCommand::StopCycle,
            ActuatorCommand::SetIntensity(0.0),
        ]
    );
    assert_eq!(
        boxes.statuses(),
        vec![StatusRecord {
            state: DeviceState::Off,
            auxiliary: 0,
        }]
    );
}

#[test]
fn test_remote_activation_then_painting() {
    let boxes = Mailboxes::new();
    let bridge = boxes.bridge();
    let mut task = boxes.coordinator();
    block_on(task.start()).unwrap();
    boxes.commands();
    boxes.updates();

    assert_eq!(
        bridge.on_attribute_write(AttributeId::DeviceState.as_u16(), 2),
        Delivery::Enqueued
    );
    pump(&mut task, &boxes).unwrap();

    assert_eq!(task.state(), DeviceState::Active);
    assert_eq!(
        boxes.commands(),
        vec![
            ActuatorCommand::SetRecording(false),
            ActuatorCommand::StopCycle,
            ActuatorCommand::SetIntensity(0.5),
        ]
    );
    assert_eq!(
        boxes.statuses(),
        vec![StatusRecord {
            state: DeviceState::Active,
            auxiliary: 2,
        }]
    );

    boxes.events.try_send(touch(TouchState::Engaged, 2200)).unwrap();
    pump(&mut task, &boxes).unwrap();

    assert_eq!(task.state(), DeviceState::Painting);
    assert_eq!(
        boxes.commands(),
        vec![
            ActuatorCommand::StopCycle,
            ActuatorCommand::SetIntensity(1.0),
            ActuatorCommand::SetRecording(true),
        ]
    );
    assert_eq!(
        boxes.statuses(),
        vec![StatusRecord {
            state: DeviceState::Painting,
            auxiliary: 2200,
        }]
    );

    boxes.events.try_send(touch(TouchState::Disengaged, 1000)).unwrap();
    pump(&mut task, &boxes).unwrap();

    assert_eq!(task.state(), DeviceState::Active);
    assert_eq!(
        boxes.commands().last(),
        Some(&ActuatorCommand::SetIntensity(0.5))
    );
}

#[test]
fn test_repeated_state_write_is_silent() {
    let boxes = Mailboxes::new();
    let bridge = boxes.bridge();
    let mut task = boxes.coordinator();
    block_on(task.start()).unwrap();
    bridge.on_attribute_write(AttributeId::DeviceState.as_u16(), 2);
    pump(&mut task, &boxes).unwrap();
    boxes.commands();
    boxes.updates();

    bridge.on_attribute_write(AttributeId::DeviceState.as_u16(), 2);
    pump(&mut task, &boxes).unwrap();

    assert_eq!(task.state(), DeviceState::Active);
    assert!(boxes.commands().is_empty());
    assert!(boxes.updates().is_empty());
}

#[test]
fn test_touch_ignored_while_off() {
    let boxes = Mailboxes::new();
    let mut task = boxes.coordinator();
    block_on(task.start()).unwrap();
    boxes.commands();
    boxes.updates();

    boxes.events.try_send(touch(TouchState::Engaged, 2200)).unwrap();
    boxes.events.try_send(Event::MotionBecameIdle).unwrap();
    pump(&mut task, &boxes).unwrap();

    assert_eq!(task.state(), DeviceState::Off);
    assert!(boxes.commands().is_empty());
}

#[test]
fn test_remote_color_writes_reach_actuator() {
    let boxes = Mailboxes::new();
    let bridge = boxes.bridge();
    let mut task = boxes.coordinator();
    block_on(task.start()).unwrap();
    boxes.commands();

    bridge.on_attribute_write(AttributeId::Hue.as_u16(), 200);
    bridge.on_attribute_write(AttributeId::Intensity.as_u16(), 250);
    bridge.on_attribute_write(AttributeId::Cycling.as_u16(), 1);
    bridge.on_attribute_write(AttributeId::Controls.as_u16(), 7);
    bridge.on_attribute_write(0x1234, 7);
    pump(&mut task, &boxes).unwrap();

    assert_eq!(task.state(), DeviceState::Off);
    assert_eq!(
        boxes.commands(),
        vec![
            ActuatorCommand::SetHue(200.0),
            ActuatorCommand::SetIntensity(1.0),
            ActuatorCommand::StartCycle,
        ]
    );
}

#[test]
fn test_color_feedback_is_mirrored() {
    let boxes = Mailboxes::new();
    let bridge = boxes.bridge();
    let mut task = boxes.coordinator();
    block_on(task.start()).unwrap();
    boxes.updates();

    let first = ColorFeedback {
        hue_deg: 40,
        intensity_pct: 10,
    };
    let second = ColorFeedback {
        hue_deg: 41,
        intensity_pct: 10,
    };
    boxes.events.try_send(Event::ColorChanged(first)).unwrap();
    boxes.events.try_send(Event::ColorChanged(second)).unwrap();
    pump(&mut task, &boxes).unwrap();

    assert_eq!(bridge.poll_update(), Some(AttributeUpdate::hue(40)));
    assert_eq!(bridge.poll_update(), Some(AttributeUpdate::intensity(10)));
    assert_eq!(block_on(bridge.next_update()), AttributeUpdate::hue(41));
    assert_eq!(bridge.poll_update(), None);
}

#[test]
fn test_stream_samples_are_published() {
    let boxes = Mailboxes::new();
    let mut task = boxes.coordinator();
    block_on(task.start()).unwrap();
    boxes.updates();

    boxes.stream.try_send(still_sample()).unwrap();
    pump(&mut task, &boxes).unwrap();

    let updates = boxes.updates();
    assert_eq!(updates, vec![AttributeUpdate::motion(&still_sample())]);
    assert_eq!(updates[0].id, AttributeId::Controls);
    assert_eq!(&updates[0].payload[..], &still_sample().to_bytes()[..]);
}

#[test]
fn test_events_served_before_stream() {
    let boxes = Mailboxes::new();
    let mut task = boxes.coordinator();
    block_on(task.start()).unwrap();
    boxes.updates();

    boxes.stream.try_send(still_sample()).unwrap();
    boxes.events.try_send(Event::MotionBecameActive).unwrap();
    block_on(task.step()).unwrap();

    assert_eq!(task.state(), DeviceState::Active);
    assert_eq!(boxes.stream.len(), 1);
}

#[test]
fn test_bridge_fault_halts() {
    let boxes = Mailboxes::new();
    let bridge = boxes.bridge();
    let task = boxes.coordinator();

    block_on(bridge.report_fault(BridgeFault::InconsistentState));
    bridge.on_attribute_write(AttributeId::DeviceState.as_u16(), 2);

    assert_eq!(block_on(task.run()), BridgeFault::InconsistentState);
    // Nothing after the fault was handled
    assert_eq!(boxes.events.len(), 1);
}

#[test]
fn test_full_inbox_rejects_remote_write() {
    let events: Channel<NoopRawMutex, Event, 2> = Channel::new();
    let updates = Updates::new();
    let bridge = WirelessBridge::new(events.sender().into(), updates.receiver().into());

    assert_eq!(bridge.on_attribute_write(0xBBD0, 1), Delivery::Enqueued);
    assert_eq!(bridge.on_attribute_write(0xBBD0, 2), Delivery::Enqueued);
    assert_eq!(bridge.on_attribute_write(0xBBD0, 3), Delivery::Full);
    assert_eq!(events.len(), 2);
}

#[test]
fn test_still_glove_falls_asleep() {
    let boxes = Mailboxes::new();
    let wake: Channel<NoopRawMutex, WakeNotice, 4> = Channel::new();
    let feedback: Channel<NoopRawMutex, Event, 16> = Channel::new();
    let config = MotionConfig::default();

    let mut sensor = MockSensor::default();
    sensor.statuses.push_back(MockSensor::wake());
    for _ in 0..config.stillness_reads {
        sensor.statuses.push_back(MockSensor::data_ready());
        sensor.samples.push_back(still_sample());
    }
    let mut motion = MotionTask::new(
        sensor,
        config,
        wake.receiver().into(),
        boxes.events.sender().into(),
        boxes.stream.sender().into(),
    );
    let mut actuator = ActuatorTask::new(
        MockStrip::default(),
        NoDelay,
        &ActuatorConfig::default(),
        boxes.commands.receiver().into(),
        feedback.sender().into(),
    );
    let mut coordinator = boxes.coordinator();

    block_on(async {
        motion.start().await.unwrap();
        coordinator.start().await.unwrap();
        actuator.start();
    });

    // Movement wakes the sensor and the glove becomes active
    block_on(motion.service());
    pump(&mut coordinator, &boxes).unwrap();
    assert_eq!(coordinator.state(), DeviceState::Active);

    let mut published = 0;
    for _ in 0..config.stillness_reads {
        block_on(motion.service());
        pump(&mut coordinator, &boxes).unwrap();
        published += boxes
            .updates()
            .iter()
            .filter(|u| u.id == AttributeId::Controls)
            .count();
    }

    assert_eq!(published, config.stillness_reads as usize - 1);
    assert_eq!(coordinator.state(), DeviceState::Sleep);

    block_on(async {
        while !boxes.commands.is_empty() {
            actuator.step().await;
        }
    });
    let color = actuator.color();
    assert!(color.cycling);
    assert_eq!(color.value, 0.1);
}
