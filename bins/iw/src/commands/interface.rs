//! Interface commands: add, del, info, dev and the `set` family.

use iwlink::cmd::{CommandDescriptor, HandlerError, Registry, Request, TargetKind};
use iwlink::netlink::AttrTable;
use iwlink::netlink::message::NLM_F_DUMP;
use iwlink::nl80211::{InterfaceInfo, InterfaceType, MonitorFlag, Nl80211Attr, Nl80211Cmd};
use iwlink::output::Printer;

type HandlerResult = Result<(), HandlerError>;

const ADD_USAGE: &str = "<name> type <type> [mesh_id <meshid>]";

pub fn register(registry: &mut Registry) {
    let add = CommandDescriptor {
        section: Some("interface"),
        name: "add",
        usage: ADD_USAGE,
        help: "Add a new virtual interface with the given configuration.",
        cmd: Nl80211Cmd::NewInterface,
        flags: 0,
        target: TargetKind::Phy,
        handler: handle_add,
        reply: None,
    };

    registry
        .register(add)
        .register(CommandDescriptor {
            target: TargetKind::Netdev,
            ..add
        })
        .register(CommandDescriptor {
            section: None,
            name: "del",
            usage: "",
            help: "Remove this virtual interface.",
            cmd: Nl80211Cmd::DelInterface,
            flags: 0,
            target: TargetKind::Netdev,
            handler: handle_no_args,
            reply: None,
        })
        .register(CommandDescriptor {
            section: None,
            name: "info",
            usage: "",
            help: "Show information for this interface.",
            cmd: Nl80211Cmd::GetInterface,
            flags: 0,
            target: TargetKind::Netdev,
            handler: handle_no_args,
            reply: Some(print_interface),
        })
        .register(CommandDescriptor {
            section: None,
            name: "dev",
            usage: "",
            help: "List all wireless interfaces.",
            cmd: Nl80211Cmd::GetInterface,
            flags: NLM_F_DUMP,
            target: TargetKind::None,
            handler: handle_no_args,
            reply: Some(print_interface),
        })
        .register(CommandDescriptor {
            section: Some("set"),
            name: "monitor",
            usage: "<flag> [...]",
            help: "Set monitor flags. Valid flags are: fcsfail plcpfail control otherbss cook",
            cmd: Nl80211Cmd::SetInterface,
            flags: 0,
            target: TargetKind::Netdev,
            handler: handle_monitor,
            reply: None,
        })
        .register(CommandDescriptor {
            section: Some("set"),
            name: "meshid",
            usage: "<meshid>",
            help: "Set the mesh ID of this interface.",
            cmd: Nl80211Cmd::SetInterface,
            flags: 0,
            target: TargetKind::Netdev,
            handler: handle_meshid,
            reply: None,
        })
        .register(CommandDescriptor {
            section: Some("set"),
            name: "type",
            usage: "<type>",
            help: "Change the operating mode of this interface.",
            cmd: Nl80211Cmd::SetInterface,
            flags: 0,
            target: TargetKind::Netdev,
            handler: handle_type,
            reply: None,
        });
}

fn parse_type(word: &str) -> Result<InterfaceType, HandlerError> {
    word.parse().map_err(HandlerError::InvalidUsage)
}

/// `<name> type <type> [mesh_id <meshid>]`
fn handle_add(request: &mut Request, args: &[String]) -> HandlerResult {
    let [name, keyword, kind, rest @ ..] = args else {
        return Err(HandlerError::Usage);
    };
    if keyword != "type" {
        return Err(HandlerError::Usage);
    }
    let iftype = parse_type(kind)?;

    let mesh_id = match rest {
        [] => None,
        [keyword, id] if keyword == "mesh_id" => Some(id),
        _ => return Err(HandlerError::Usage),
    };

    let attrs = request.attrs();
    attrs.append_str(Nl80211Attr::Ifname as u16, name)?;
    attrs.append_u32(Nl80211Attr::Iftype as u16, iftype.as_u32())?;
    if let Some(id) = mesh_id {
        attrs.append(Nl80211Attr::MeshId as u16, id.as_bytes())?;
    }

    Ok(())
}

fn handle_no_args(_request: &mut Request, args: &[String]) -> HandlerResult {
    if !args.is_empty() {
        return Err(HandlerError::Usage);
    }
    Ok(())
}

/// `<flag> [...]`: every word must be a known flag.
fn handle_monitor(request: &mut Request, args: &[String]) -> HandlerResult {
    if args.is_empty() {
        return Err(HandlerError::Usage);
    }

    let mut flags = request.attrs().nest();
    for arg in args {
        let flag: MonitorFlag = arg.parse().map_err(HandlerError::Invalid)?;
        flags.append_flag(flag.attr())?;
    }

    let attrs = request.attrs();
    attrs.append_u32(Nl80211Attr::Iftype as u16, InterfaceType::Monitor.as_u32())?;
    attrs.append_nested(Nl80211Attr::MntrFlags as u16, &flags)?;
    Ok(())
}

fn handle_meshid(request: &mut Request, args: &[String]) -> HandlerResult {
    let [id] = args else {
        return Err(HandlerError::Usage);
    };
    request
        .attrs()
        .append(Nl80211Attr::MeshId as u16, id.as_bytes())?;
    Ok(())
}

fn handle_type(request: &mut Request, args: &[String]) -> HandlerResult {
    let [kind] = args else {
        return Err(HandlerError::Usage);
    };
    let iftype = parse_type(kind)?;
    request
        .attrs()
        .append_u32(Nl80211Attr::Iftype as u16, iftype.as_u32())?;
    Ok(())
}

fn print_interface(attrs: &AttrTable<'_>, printer: &mut Printer<'_>) -> iwlink::Result<()> {
    let info = InterfaceInfo::from_attrs(attrs)?;
    printer.print(&info)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use iwlink::Error;
    use iwlink::cmd::{Channel, DeviceLookup, Dispatcher, Resolver, Target};
    use iwlink::netlink::{AttrBuilder, decode_attrs};

    use super::*;

    struct Devices(HashMap<&'static str, u32>, HashMap<&'static str, u32>);

    impl DeviceLookup for Devices {
        fn netdev_index(&self, name: &str) -> Option<u32> {
            self.0.get(name).copied()
        }

        fn phy_index(&self, name: &str) -> Option<u32> {
            self.1.get(name).copied()
        }
    }

    fn devices() -> Resolver<Devices> {
        Resolver::new(Devices(
            HashMap::from([("wlan0", 3)]),
            HashMap::from([("phy0", 0)]),
        ))
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        register(&mut registry);
        registry
    }

    fn argv(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn netdev_request(cmd: Nl80211Cmd) -> Request {
        let target = Target::Netdev {
            ifindex: 3,
            name: "wlan0".into(),
        };
        Request::new(cmd, 0, Some(target)).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<Vec<u8>>>,
        replies: Vec<Vec<u8>>,
    }

    impl Channel for Recorder {
        async fn execute(
            &self,
            request: &Request,
            on_reply: &mut dyn FnMut(&[u8]) -> iwlink::Result<()>,
        ) -> iwlink::Result<()> {
            self.sent.borrow_mut().push(request.body().to_vec());
            for reply in &self.replies {
                on_reply(reply)?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_add_monitor() {
        let mut request = netdev_request(Nl80211Cmd::NewInterface);
        handle_add(&mut request, &argv("foo type monitor")).unwrap();

        let table = AttrTable::parse(request.body()).unwrap();
        assert_eq!(table.str(Nl80211Attr::Ifname as u16).unwrap(), Some("foo"));
        assert_eq!(table.u32(Nl80211Attr::Iftype as u16).unwrap(), Some(6));
        assert!(!table.contains(Nl80211Attr::MeshId as u16));
    }

    #[test]
    fn test_add_mesh_with_id() {
        let mut request = netdev_request(Nl80211Cmd::NewInterface);
        handle_add(&mut request, &argv("foo type mesh mesh_id bar")).unwrap();

        let table = AttrTable::parse(request.body()).unwrap();
        assert_eq!(table.u32(Nl80211Attr::Iftype as u16).unwrap(), Some(7));
        assert_eq!(table.bytes(Nl80211Attr::MeshId as u16), Some(&b"bar"[..]));
    }

    #[test]
    fn test_add_rejects_malformed_lines() {
        for line in [
            "",
            "foo",
            "foo type",
            "foo kind monitor",
            "foo type monitor mesh_id",
            "foo type monitor meshid bar",
            "foo type monitor mesh_id bar extra",
        ] {
            let mut request = netdev_request(Nl80211Cmd::NewInterface);
            assert!(
                matches!(handle_add(&mut request, &argv(line)), Err(HandlerError::Usage)),
                "accepted {line:?}"
            );
        }

        let mut request = netdev_request(Nl80211Cmd::NewInterface);
        let err = handle_add(&mut request, &argv("foo type ap")).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidUsage(ref m) if m == "invalid interface type ap"));
    }

    #[test]
    fn test_monitor_flags_in_order() {
        let mut request = netdev_request(Nl80211Cmd::SetInterface);
        handle_monitor(&mut request, &argv("fcsfail control")).unwrap();

        let table = AttrTable::parse(request.body()).unwrap();
        assert_eq!(table.u32(Nl80211Attr::Iftype as u16).unwrap(), Some(6));

        let flags = table.get(Nl80211Attr::MntrFlags as u16).unwrap();
        assert!(flags.nested);
        let entries = decode_attrs(flags.payload).unwrap();
        let kinds: Vec<u16> = entries.iter().map(|attr| attr.kind).collect();
        assert_eq!(kinds, [MonitorFlag::FcsFail.attr(), MonitorFlag::Control.attr()]);
        assert!(entries.iter().all(|attr| attr.payload.is_empty()));
    }

    #[test]
    fn test_monitor_unknown_flag() {
        let mut request = netdev_request(Nl80211Cmd::SetInterface);
        let err = handle_monitor(&mut request, &argv("fcsfail bogus")).unwrap_err();
        assert!(matches!(err, HandlerError::Invalid(ref m) if m == "unknown flag bogus"));

        let mut request = netdev_request(Nl80211Cmd::SetInterface);
        assert!(matches!(
            handle_monitor(&mut request, &[]),
            Err(HandlerError::Usage)
        ));
    }

    #[test]
    fn test_meshid_and_type() {
        let mut request = netdev_request(Nl80211Cmd::SetInterface);
        handle_meshid(&mut request, &argv("mymesh")).unwrap();
        let table = AttrTable::parse(request.body()).unwrap();
        assert_eq!(table.bytes(Nl80211Attr::MeshId as u16), Some(&b"mymesh"[..]));

        let mut request = netdev_request(Nl80211Cmd::SetInterface);
        assert!(matches!(
            handle_meshid(&mut request, &argv("a b")),
            Err(HandlerError::Usage)
        ));

        let mut request = netdev_request(Nl80211Cmd::SetInterface);
        handle_type(&mut request, &argv("ibss")).unwrap();
        let table = AttrTable::parse(request.body()).unwrap();
        assert_eq!(table.u32(Nl80211Attr::Iftype as u16).unwrap(), Some(1));
    }

    #[test]
    fn test_interface_add_missing_type_is_usage_error() {
        let registry = registry();
        let err = Dispatcher::new(&registry, devices())
            .prepare(&argv("interface add wlan0 foo"))
            .unwrap_err();
        assert!(err.is_usage());
        assert_eq!(
            err.to_string(),
            "Usage: interface add <dev> <name> type <type> [mesh_id <meshid>]"
        );
    }

    #[test]
    fn test_interface_add_on_phy_and_netdev() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, devices());

        let invocation = dispatcher
            .prepare(&argv("interface add phy0 mon0 type monitor"))
            .unwrap();
        assert_eq!(invocation.descriptor().target, TargetKind::Phy);
        let table = AttrTable::parse(invocation.request().body()).unwrap();
        assert_eq!(table.u32(Nl80211Attr::Wiphy as u16).unwrap(), Some(0));

        let invocation = dispatcher
            .prepare(&argv("interface add wlan0 mon0 type monitor"))
            .unwrap();
        assert_eq!(invocation.descriptor().target, TargetKind::Netdev);
        let table = AttrTable::parse(invocation.request().body()).unwrap();
        assert_eq!(table.u32(Nl80211Attr::Ifindex as u16).unwrap(), Some(3));
    }

    #[test]
    fn test_set_monitor_on_phy_is_rejected() {
        let registry = registry();
        let err = Dispatcher::new(&registry, devices())
            .prepare(&argv("set monitor phy0 control"))
            .unwrap_err();
        assert!(matches!(err, Error::TargetKindMismatch { .. }));
    }

    #[tokio::test]
    async fn test_bogus_flag_sends_nothing() {
        let registry = registry();
        let channel = Recorder::default();
        let mut out = Vec::new();
        let mut printer = Printer::text(&mut out);

        let err = Dispatcher::new(&registry, devices())
            .dispatch(&channel, &argv("set monitor wlan0 bogus"), &mut printer)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown flag bogus");
        assert_eq!(err.exit_code(), 2);
        assert!(channel.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_info_prints_reply() {
        let mut reply = AttrBuilder::new();
        reply.append_u32(Nl80211Attr::Ifindex as u16, 3).unwrap();
        reply.append_str(Nl80211Attr::Ifname as u16, "wlan0").unwrap();
        reply.append_u32(Nl80211Attr::Iftype as u16, 2).unwrap();
        reply.append_u32(Nl80211Attr::Wiphy as u16, 0).unwrap();

        let channel = Recorder {
            replies: vec![reply.as_bytes().to_vec()],
            ..Default::default()
        };
        let registry = registry();
        let mut out = Vec::new();
        let mut printer = Printer::text(&mut out);

        Dispatcher::new(&registry, devices())
            .dispatch(&channel, &argv("info wlan0"), &mut printer)
            .await
            .unwrap();
        drop(printer);

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Interface wlan0\n\tifindex 3\n\ttype managed\n\twiphy 0\n"
        );
    }
}
