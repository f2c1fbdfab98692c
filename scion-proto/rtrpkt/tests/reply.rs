// Copyright 2026 Anapaya Systems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reply creation for packets arriving from each direction

use std::net::{Ipv4Addr, SocketAddr};

use bytes::Bytes;
use rtrpkt::{
    ContextError, Dir, PathError, RouterConfig, RouterContext, RtrPkt, RtrPktError, ScnPkt,
    config::InterfaceConfig,
    context::{EgressPair, Ingress, OutputChannel},
    core::encode::WireEncode,
    l4::{L4, L4Header, scmp::Scmp, udp::Udp},
    path::model::{HopField, HopFieldFlags, InfoField, InfoFieldFlags, Path, Segment},
    types::{HostAddr, IfId, IsdAsn, next_hdr},
};

const LOCAL_IA: IsdAsn = IsdAsn::new(1, 110);
const REMOTE_SRC_IA: IsdAsn = IsdAsn::new(1, 100);
const REMOTE_DST_IA: IsdAsn = IsdAsn::new(2, 200);

fn remote_addr(ifid: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::new(192, 168, 0, ifid as u8), 50000))
}

fn context() -> RouterContext {
    let mut config = RouterConfig::new(LOCAL_IA);
    for ifid in [2, 4, 6] {
        config.interfaces.insert(
            ifid,
            InterfaceConfig {
                remote_addr: remote_addr(ifid),
            },
        );
    }
    config
        .local_outputs
        .push(SocketAddr::from((Ipv4Addr::new(10, 0, 0, 1), 30042)));
    RouterContext::new(config)
}

fn hop(cons_ingress: u16, cons_egress: u16, flags: HopFieldFlags) -> HopField {
    HopField {
        flags,
        cons_ingress,
        cons_egress,
        ..Default::default()
    }
}

fn info(flags: InfoFieldFlags) -> InfoField {
    InfoField {
        flags,
        ..Default::default()
    }
}

/// A construction direction segment over this AS followed by a single crossover hop.
///
/// Reversed, the path starts at the crossover hop.
fn crossover_path() -> Path {
    Path::from_segments(&[
        Segment::new(
            info(InfoFieldFlags::CONS_DIR),
            vec![
                hop(0, 1, HopFieldFlags::empty()),
                hop(2, 3, HopFieldFlags::empty()),
                hop(4, 5, HopFieldFlags::empty()),
            ],
        ),
        Segment::new(
            info(InfoFieldFlags::empty()),
            vec![hop(7, 6, HopFieldFlags::XOVER)],
        ),
    ])
    .unwrap()
}

fn straight_path() -> Path {
    Path::from_segments(&[Segment::new(
        info(InfoFieldFlags::CONS_DIR),
        vec![
            hop(0, 1, HopFieldFlags::empty()),
            hop(2, 3, HopFieldFlags::empty()),
            hop(4, 0, HopFieldFlags::empty()),
        ],
    )])
    .unwrap()
}

fn remote_description(path: Option<Path>) -> ScnPkt {
    ScnPkt {
        path,
        l4: Some(L4::Udp(Udp::new(40000, 30041))),
        payload: Some(Bytes::from_static(b"ping")),
        ..ScnPkt::new(
            REMOTE_DST_IA,
            REMOTE_SRC_IA,
            HostAddr::Ipv4(Ipv4Addr::new(172, 16, 0, 2)),
            HostAddr::Ipv4(Ipv4Addr::new(172, 16, 0, 1)),
        )
    }
}

/// Assembles `sp` and receives it from a neighboring AS on interface 2
fn receive_external(sp: &ScnPkt, ctx: &RouterContext) -> RtrPkt {
    receive_external_on(sp, ctx, Some(2))
}

/// Assembles `sp` and receives it from a neighboring AS with the ingress binding naming `ifid`
fn receive_external_on(sp: &ScnPkt, ctx: &RouterContext, ifid: Option<IfId>) -> RtrPkt {
    let wire = RtrPkt::from_description(sp, Dir::SelfOrigin, ctx).unwrap();
    let ingress = Ingress {
        src: remote_addr(2),
        dst: SocketAddr::from((Ipv4Addr::new(192, 168, 1, 1), 50000)),
        loc_idx: 0,
        ifid,
    };
    RtrPkt::parse(wire.raw(), Dir::External, Some(ingress), ctx).unwrap()
}

fn path_pointers(rp: &RtrPkt) -> (usize, usize) {
    let path = rp.to_description().unwrap().path.unwrap();
    (path.inf_off, path.hop_off)
}

#[test_log::test]
fn should_advance_crossover_once_without_forward_increment() {
    let ctx = context();
    let mut path = crossover_path();
    path.increment().unwrap();
    let inbound = receive_external(&remote_description(Some(path)), &ctx);
    assert!(!inbound.incremented_path());

    let reply = inbound.reply(&ctx).unwrap();

    // Crossed from the crossover segment to the first hop of the next one
    assert_eq!(path_pointers(&reply), (16, 24));
    assert_eq!(reply.hop_field().unwrap(), hop(4, 5, HopFieldFlags::empty()));
    assert_eq!(
        reply.egress(),
        &[EgressPair {
            channel: OutputChannel::External(2),
            dst: remote_addr(2),
        }]
    );
}

#[test_log::test]
fn should_advance_crossover_twice_after_forward_increment() {
    let ctx = context();
    let mut path = crossover_path();
    path.increment().unwrap();
    let mut inbound = receive_external(&remote_description(Some(path)), &ctx);
    assert_eq!(inbound.inc_path(), Ok(false));
    assert!(inbound.incremented_path());

    let reply = inbound.reply(&ctx).unwrap();

    assert_eq!(path_pointers(&reply), (16, 32));
    assert_eq!(reply.hop_field().unwrap(), hop(2, 3, HopFieldFlags::empty()));
    // Advancing the inbound path does not move the reply off the arrival link
    assert_eq!(
        reply.egress(),
        &[EgressPair {
            channel: OutputChannel::External(2),
            dst: remote_addr(2),
        }]
    );
}

#[test_log::test]
fn should_reply_on_arrival_hop_interface_after_forward_increment() {
    let ctx = context();
    let mut path = crossover_path();
    path.increment().unwrap();
    let mut inbound = receive_external_on(&remote_description(Some(path)), &ctx, None);
    assert_eq!(inbound.arrival_interface(), Some(2));

    inbound.inc_path().unwrap();
    assert_eq!(inbound.if_curr(), Ok(4));
    assert_eq!(inbound.arrival_interface(), Some(2));

    let reply = inbound.reply(&ctx).unwrap();

    assert_eq!(
        reply.egress(),
        &[EgressPair {
            channel: OutputChannel::External(2),
            dst: remote_addr(2),
        }]
    );
}

#[test_log::test]
fn should_fail_on_unreadable_hop_field() {
    let ctx = context();
    let inbound = receive_external(&remote_description(Some(straight_path())), &ctx);

    // The second info field announces hops the path does not contain
    let first = InfoField {
        hops: 1,
        ..info(InfoFieldFlags::CONS_DIR)
    };
    let second = InfoField {
        hops: 3,
        ..info(InfoFieldFlags::empty())
    };
    let mut raw = vec![0u8; 24];
    first.encode(&mut raw[0..8]).unwrap();
    hop(1, 0, HopFieldFlags::XOVER).encode(&mut raw[8..16]).unwrap();
    second.encode(&mut raw[16..24]).unwrap();

    let mut desc = inbound.create_reply_desc(&ctx).unwrap();
    desc.path = Some(Path::new(Bytes::from(raw), 0, 8));

    assert_eq!(
        inbound.create_reply(&desc, &ctx).unwrap_err(),
        RtrPktError::Path(PathError::UnreadableField {
            field: "hop field",
            offset: 24,
        })
    );
}

#[test_log::test]
fn should_advance_once_for_external_ingress_without_crossover() {
    let ctx = context();
    let mut path = straight_path();
    path.increment().unwrap();
    let inbound = receive_external(&remote_description(Some(path)), &ctx);

    let reply = inbound.reply(&ctx).unwrap();

    assert!(!reply.info_field().unwrap().cons_dir());
    assert_eq!(path_pointers(&reply), (0, 16));
    assert_eq!(reply.hop_field().unwrap(), hop(2, 3, HopFieldFlags::empty()));
    assert_eq!(reply.if_curr(), Ok(2));
    assert_eq!(reply.dir_to(), Dir::External);
    assert_eq!(reply.dir_from(), Dir::SelfOrigin);
}

#[test_log::test]
fn should_reverse_addresses_and_transport() {
    let ctx = context();
    let sp = remote_description(Some(straight_path()));
    let inbound = receive_external(&sp, &ctx);

    let desc = inbound.create_reply_desc(&ctx).unwrap();

    assert_eq!(desc.dst_ia, sp.src_ia);
    assert_eq!(desc.src_ia, sp.dst_ia);
    assert_eq!(desc.dst_host, sp.src_host);
    assert_eq!(desc.src_host, sp.dst_host);
    match desc.l4 {
        Some(L4::Udp(udp)) => assert_eq!((udp.src_port, udp.dst_port), (30041, 40000)),
        other => panic!("unexpected transport header {other:?}"),
    }
    let path = desc.path.unwrap();
    assert_eq!((path.inf_off, path.hop_off), (0, 8));
}

#[test_log::test]
fn should_answer_local_host_as_router() {
    let ctx = context();
    let sender = SocketAddr::from((Ipv4Addr::new(10, 0, 0, 5), 31000));
    let router = SocketAddr::from((Ipv4Addr::new(10, 0, 0, 1), 30042));
    let sp = ScnPkt {
        path: Some(straight_path()),
        ..ScnPkt::new(
            REMOTE_DST_IA,
            LOCAL_IA,
            HostAddr::Ipv4(Ipv4Addr::new(172, 16, 0, 2)),
            HostAddr::from(sender.ip()),
        )
    };
    let wire = RtrPkt::from_description(&sp, Dir::SelfOrigin, &ctx).unwrap();
    let ingress = Ingress {
        src: sender,
        dst: router,
        loc_idx: 0,
        ifid: None,
    };
    let inbound = RtrPkt::parse(wire.raw(), Dir::Local, Some(ingress), &ctx).unwrap();

    let reply = inbound.reply(&ctx).unwrap();

    // Plain reversal would have used the remote destination host
    assert_ne!(sp.dst_host, HostAddr::from(router.ip()));
    assert_eq!(reply.src_host(), HostAddr::from(router.ip()));
    assert_eq!(reply.src_ia(), LOCAL_IA);
    assert_eq!(reply.dst_host(), HostAddr::from(sender.ip()));
    assert_eq!(reply.dst_ia(), LOCAL_IA);
    // Destined to the local AS, so the pointers stay on the first hop
    assert_eq!(path_pointers(&reply), (0, 8));
    assert_eq!(reply.dir_to(), Dir::Local);
    assert_eq!(
        reply.egress(),
        &[EgressPair {
            channel: OutputChannel::Local(0),
            dst: sender,
        }]
    );
}

#[test_log::test]
fn should_carry_customized_description() {
    let ctx = context();
    let inbound = receive_external(&remote_description(Some(straight_path())), &ctx);

    let mut desc = inbound.create_reply_desc(&ctx).unwrap();
    desc.l4 = Some(L4::Scmp(Scmp::new(1, 2, 1_700_000_000)));
    desc.payload = Some(Bytes::copy_from_slice(inbound.raw()));
    let reply = inbound.create_reply(&desc, &ctx).unwrap();

    assert_eq!(reply.common_header().next_hdr, next_hdr::SCMP);
    assert_eq!(reply.payload(), inbound.raw());
    let scmp = reply.l4().unwrap();
    assert_eq!(scmp.protocol(), next_hdr::SCMP);
    assert_eq!(reply.len(), desc.total_len());
}

#[test_log::test]
fn should_fail_on_exhausted_path() {
    let ctx = context();
    let path = Path::from_segments(&[Segment::new(
        info(InfoFieldFlags::CONS_DIR),
        vec![hop(2, 3, HopFieldFlags::empty())],
    )])
    .unwrap();
    let inbound = receive_external(&remote_description(Some(path)), &ctx);

    assert_eq!(
        inbound.reply(&ctx).unwrap_err(),
        RtrPktError::Path(PathError::Exhausted(8))
    );
}

#[test_log::test]
fn should_use_ingress_interface_without_path() {
    let ctx = context();
    let inbound = receive_external(&remote_description(None), &ctx);

    let reply = inbound.reply(&ctx).unwrap();

    assert_eq!(reply.to_description().unwrap().path, None);
    assert_eq!(
        reply.egress(),
        &[EgressPair {
            channel: OutputChannel::External(2),
            dst: remote_addr(2),
        }]
    );
}

#[test]
fn should_require_ingress_for_local_packets() {
    let ctx = context();
    let wire =
        RtrPkt::from_description(&remote_description(None), Dir::SelfOrigin, &ctx).unwrap();
    let inbound = RtrPkt::parse(wire.raw(), Dir::Local, None, &ctx).unwrap();

    assert_eq!(
        inbound.reply(&ctx).unwrap_err(),
        RtrPktError::Context(ContextError::MissingIngress)
    );
}

#[test]
fn should_reject_unknown_egress_interface() {
    let ctx = context();
    let mut path = Path::from_segments(&[Segment::new(
        info(InfoFieldFlags::CONS_DIR),
        vec![
            hop(0, 1, HopFieldFlags::empty()),
            hop(9, 3, HopFieldFlags::empty()),
            hop(4, 0, HopFieldFlags::empty()),
        ],
    )])
    .unwrap();
    path.increment().unwrap();
    let inbound = receive_external_on(&remote_description(Some(path)), &ctx, None);

    assert_eq!(
        inbound.reply(&ctx).unwrap_err(),
        RtrPktError::Context(ContextError::UnknownInterface(9))
    );
}
