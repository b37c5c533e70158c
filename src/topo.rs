use crate::store::AigStore;
use crate::types::Var;

#[derive(Copy, Clone, Eq, PartialEq)]
enum Mark {
    New,
    Open,
    Done,
}

/// Postorder of the registered variables accepted by `include`, following
/// the children of every definition.
///
/// An edge back to a variable still on the stack closes a cycle and is
/// skipped, so every variable appears exactly once and after all children
/// it does not cycle through.
pub fn postorder(store: &AigStore, include: impl Fn(Var) -> bool) -> Vec<Var> {
    let n = store.len();
    let mut mark = vec![Mark::New; n];
    let mut order = Vec::with_capacity(n);
    let mut stack: Vec<(Var, Vec<Var>, usize)> = Vec::new();

    let children_of = |v: Var| -> Vec<Var> {
        store
            .defs(v)
            .iter()
            .flat_map(|node| store.children(node).iter().map(|lit| lit.var()))
            .collect()
    };

    for i in 0..n as u32 {
        let start = Var::new(i);
        if mark[start.index()] != Mark::New || !store.is_registered(start) || !include(start) {
            continue;
        }
        mark[start.index()] = Mark::Open;
        stack.push((start, children_of(start), 0));

        while let Some((v, children, next)) = stack.last_mut() {
            if let Some(&c) = children.get(*next) {
                *next += 1;
                let ok = c.index() < n && store.is_registered(c) && include(c);
                if ok && mark[c.index()] == Mark::New {
                    mark[c.index()] = Mark::Open;
                    let grand = children_of(c);
                    stack.push((c, grand, 0));
                } else if ok && mark[c.index()] == Mark::Open {
                    log::trace!("postorder: cycle through {} at {}", c, v);
                }
            } else {
                let v = *v;
                mark[v.index()] = Mark::Done;
                order.push(v);
                stack.pop();
            }
        }
    }
    order
}
