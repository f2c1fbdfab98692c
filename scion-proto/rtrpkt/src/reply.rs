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

//! Reply engine
//!
//! Turns a received or locally created packet around so the router can answer it, e.g. with
//! an SCMP error. Creating a reply is split in two steps so that callers can adjust the
//! reversed description before it is assembled:
//!
//! 1. [`RtrPkt::create_reply_desc`] reverses the packet description and readdresses it.
//! 2. [`RtrPkt::create_reply`] assembles the description, moves the path pointers past the
//!    hops this router already consumed and binds the reply to an egress channel.

use tracing::debug;

use crate::{
    context::{Dir, EgressPair, RouterContext},
    error::{ContextError, PathError, RtrPktError},
    rpkt::RtrPkt,
    spkt::ScnPkt,
    types::HostAddr,
};

/// Number of times the path of a reply is advanced after assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAdvance {
    /// Keep the pointers on the first hop.
    None,
    /// Advance once.
    Once,
    /// Advance twice.
    Twice,
}
impl PathAdvance {
    /// Number of increments
    pub fn count(self) -> usize {
        match self {
            PathAdvance::None => 0,
            PathAdvance::Once => 1,
            PathAdvance::Twice => 2,
        }
    }
}

/// Decides how far the path of a reply has to be advanced.
///
/// * `dst_local`: the reply is destined to the local AS.
/// * `xover`: the current hop field of the assembled reply is a crossover hop.
/// * `forward_incremented`: the path of the inbound packet was advanced while it was
///   forwarded by this router.
/// * `dir_from`: where the inbound packet came from.
pub fn path_advance(
    dst_local: bool,
    xover: bool,
    forward_incremented: bool,
    dir_from: Dir,
) -> PathAdvance {
    match (dst_local, xover, forward_incremented, dir_from) {
        (true, ..) => PathAdvance::None,
        (false, true, true, _) => PathAdvance::Twice,
        (false, true, false, _) => PathAdvance::Once,
        (false, false, _, Dir::External) => PathAdvance::Once,
        (false, false, _, Dir::Local | Dir::SelfOrigin) => PathAdvance::None,
    }
}

impl RtrPkt {
    /// Reverses the packet description for a reply.
    ///
    /// Replies to packets from a local host are sent by the router itself, so their source is
    /// set to the local AS and the address the packet was received on.
    pub fn create_reply_desc(&self, ctx: &RouterContext) -> Result<ScnPkt, RtrPktError> {
        let mut sp = self.to_description()?;
        sp.reverse()?;

        if self.dir_from() == Dir::Local {
            let ingress = self.ingress().ok_or(ContextError::MissingIngress)?;
            sp.src_ia = ctx.local_ia();
            sp.src_host = HostAddr::from(ingress.dst.ip());
        }
        Ok(sp)
    }

    /// Assembles a reply from a reversed description.
    ///
    /// The returned packet has its path pointers on the hop the router forwards the reply
    /// with and exactly one egress target.
    pub fn create_reply(&self, sp: &ScnPkt, ctx: &RouterContext) -> Result<RtrPkt, RtrPktError> {
        let mut reply = RtrPkt::from_description(sp, self.dir_from(), ctx)?;

        let dst_local = reply.dst_ia() == ctx.local_ia();
        let (xover, advance) = match reply.hop_field() {
            Ok(hop) => {
                let xover = hop.xover();
                let advance =
                    path_advance(dst_local, xover, self.incremented_path(), self.dir_from());
                (xover, advance)
            }
            // Nothing to advance
            Err(PathError::NoPath) => (false, PathAdvance::None),
            Err(e) => return Err(e.into()),
        };
        for _ in 0..advance.count() {
            reply.inc_path()?;
        }

        let egress = self.reply_egress(ctx)?;
        reply.push_egress(egress);

        debug!(
            id = self.id(),
            reply_id = reply.id(),
            dir_from = ?self.dir_from(),
            xover,
            advance = advance.count(),
            egress = ?egress,
            "Created reply"
        );
        Ok(reply)
    }

    /// Creates a reply without changes to the reversed description.
    pub fn reply(&self, ctx: &RouterContext) -> Result<RtrPkt, RtrPktError> {
        let sp = self.create_reply_desc(ctx)?;
        self.create_reply(&sp, ctx)
    }

    /// Where the reply to this packet leaves the router
    ///
    /// Local hosts are answered on the channel the packet arrived on and packets from a
    /// neighboring AS on the interface they arrived on. Locally created packets leave through
    /// the outbound interface of the current hop field, or the channel they arrived on if they
    /// have no path.
    fn reply_egress(&self, ctx: &RouterContext) -> Result<EgressPair, RtrPktError> {
        let ingress = self.ingress().ok_or(ContextError::MissingIngress);

        match self.dir_from() {
            Dir::Local => {
                let ingress = ingress?;
                Ok(ctx.local_egress(ingress.loc_idx, ingress.src)?)
            }
            Dir::External => {
                match self.arrival_interface() {
                    Some(ifid) => Ok(ctx.external_egress(ifid)?),
                    None => {
                        let ingress = ingress?;
                        Ok(ctx.local_egress(ingress.loc_idx, ingress.src)?)
                    }
                }
            }
            Dir::SelfOrigin => {
                match self.if_curr() {
                    Ok(ifid) => Ok(ctx.external_egress(ifid)?),
                    Err(PathError::NoPath) => {
                        let ingress = ingress?;
                        match ingress.ifid {
                            Some(ifid) => Ok(ctx.external_egress(ifid)?),
                            None => Ok(ctx.local_egress(ingress.loc_idx, ingress.src)?),
                        }
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}
