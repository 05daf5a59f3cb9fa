use std::fs;
use std::path::PathBuf;

use retrace_core::event::Event;
use retrace_core::ids::NodeId;
use retrace_core::node::NodeKind;
use retrace_input::reader::LogReader;

const SAMPLE_LOG: &str = r#"<?xml version="1.0"?>
<log>
  <configuration>
    <field>
      <x>100</x>
      <y>80</y>
    </field>
    <simulationtime>120.5</simulationtime>
    <communicationradius>5</communicationradius>
    <description write="Two drones and one intruder"/>
  </configuration>
  <positions>
    <position>
      <id>1</id>
      <x>10.0</x>
      <y>20.0</y>
      <info nodetype="UAV"/>
      <ismobile>true</ismobile>
    </position>
    <position>
      <id>2</id>
      <x>12.0</x>
      <y>20.0</y>
      <info nodetype="uav"/>
      <ismobile>true</ismobile>
    </position>
    <position>
      <id>3</id>
      <x>30.0</x>
      <y>40.0</y>
      <info nodetype="INTRUDER"/>
      <ismobile>false</ismobile>
    </position>
  </positions>
  <simulationrun>
    <enqueue>
      <time>2.0</time>
      <id>41</id>
      <receiverid>-1</receiverid>
      <tolayer>
        <senderlayer>physical</senderlayer>
        <senderid>1</senderid>
        <internreceiverid>2</internreceiverid>
      </tolayer>
    </enqueue>
    <enqueue>
      <time>2.0</time>
      <id>41</id>
      <receiverid>-1</receiverid>
      <tolayer>
        <senderlayer>physical</senderlayer>
        <senderid>1</senderid>
        <internreceiverid>3</internreceiverid>
      </tolayer>
    </enqueue>
    <enqueue>
      <time>2.5</time>
      <id>42</id>
      <receiverid>3</receiverid>
      <tolayer>
        <senderlayer>application</senderlayer>
        <senderid>2</senderid>
        <internreceiverid>3</internreceiverid>
      </tolayer>
    </enqueue>
    <enqueue>
      <time>3.0</time>
      <id>43</id>
      <receiverid>3</receiverid>
      <tolayer>
        <senderlayer>physical</senderlayer>
        <senderid>2</senderid>
        <internreceiverid>3</internreceiverid>
      </tolayer>
    </enqueue>
    <move id="1" x="11.0" y="21.0" time="2.0"/>
    <move id="2" x="13.0" y="21.0" time="2.0"/>
    <move id="99" x="5.0" y="5.0" time="2.5"/>
  </simulationrun>
</log>
"#;

fn write_sample(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("retrace_reader_{}.xml", name));
    fs::write(&path, SAMPLE_LOG).expect("failed to write sample log");
    path
}

#[test]
fn reads_field_configuration_scaled() {
    let path = write_sample("config");
    let dataset = LogReader::new(&path).read().expect("read should succeed");
    fs::remove_file(&path).ok();

    assert_eq!(dataset.width, 1000);
    assert_eq!(dataset.height, 800);
    assert_eq!(dataset.max_sim_time, 120.5);
    assert_eq!(dataset.radius_comm, 50.0);
    assert_eq!(dataset.description, "Two drones and one intruder");
}

#[test]
fn reads_nodes_with_kinds_and_scaled_positions() {
    let path = write_sample("nodes");
    let dataset = LogReader::new(&path).read().expect("read should succeed");
    fs::remove_file(&path).ok();

    assert_eq!(dataset.node_count(), 3);
    let uav = dataset.node(NodeId::from(1)).expect("node 1 should exist");
    assert_eq!(uav.kind, NodeKind::Uav);
    assert_eq!(uav.x, 100.0);
    assert_eq!(uav.y, 200.0);
    assert_eq!(uav.radius_comm, 50.0);
    assert!(uav.is_mobile);

    let intruder = dataset.node(NodeId::from(3)).expect("node 3 should exist");
    assert_eq!(intruder.kind, NodeKind::Intruder);
    assert!(!intruder.is_mobile);
}

#[test]
fn builds_timeline_with_layer_filter_and_batched_moves() {
    let path = write_sample("timeline");
    let dataset = LogReader::new(&path).read().expect("read should succeed");
    fs::remove_file(&path).ok();

    // Move batch at t=2.0, broadcast at t=2.0 after it, the application
    // layer record filtered out, then the unicast at t=3.0.
    assert_eq!(dataset.event_count(), 3);
    let events = dataset.events();

    let Event::Move(batch) = &events[0] else {
        panic!("first event should be a move batch");
    };
    assert_eq!(batch.time, 2.0);
    assert_eq!(batch.moves.len(), 2);
    assert_eq!(batch.moves[0].x, 110.0);

    let Event::Msg(broadcast) = &events[1] else {
        panic!("second event should be the broadcast");
    };
    assert_eq!(broadcast.time, 2.0);
    assert_eq!(broadcast.source, NodeId::from(1));
    assert_eq!(
        broadcast.destinations,
        vec![NodeId::from(2), NodeId::from(3)]
    );

    let Event::Msg(unicast) = &events[2] else {
        panic!("third event should be the unicast");
    };
    assert_eq!(unicast.time, 3.0);
    assert_eq!(unicast.source, NodeId::from(2));
    assert_eq!(unicast.destinations, vec![NodeId::from(3)]);
    // Non-physical records never reach the timeline, so they do not
    // consume a sequence number.
    assert_eq!(unicast.seq, 2);
}

#[test]
fn missing_file_is_an_error() {
    let path = std::env::temp_dir().join("retrace_reader_does_not_exist.xml");
    assert!(LogReader::new(&path).read().is_err());
}
