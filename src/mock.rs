/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */
//! In-memory stand-in for a Redis server, speaking packed RESP through `ConnectionLike`.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use redis::{ConnectionLike, ErrorKind, RedisError, RedisResult, Value};

use crate::adaptor::RedisAdaptor;
use crate::config::ShardInfo;
use crate::connection::{Connector, ShardedConnection};
use crate::sharding::{Hashing, ShardRing};

type Args = Vec<Vec<u8>>;

#[derive(Debug, Clone)]
enum Entry {
    Str(Vec<u8>),
    List(VecDeque<Vec<u8>>),
    Set(BTreeSet<Vec<u8>>),
    Hash(BTreeMap<Vec<u8>, Vec<u8>>),
    ZSet(Vec<(Vec<u8>, f64)>),
}

impl Entry {
    fn type_name(&self) -> &'static str {
        match self {
            Entry::Str(_) => "string",
            Entry::List(_) => "list",
            Entry::Set(_) => "set",
            Entry::Hash(_) => "hash",
            Entry::ZSet(_) => "zset",
        }
    }

    fn encoding(&self) -> &'static str {
        match self {
            Entry::Str(v) if int_arg(v).is_ok() => "int",
            Entry::Str(v) if v.len() <= 44 => "embstr",
            Entry::Str(_) => "raw",
            Entry::Set(s) if s.iter().all(|m| int_arg(m).is_ok()) => "intset",
            _ => "listpack",
        }
    }
}

#[derive(Debug, Default)]
struct Db {
    data: BTreeMap<Vec<u8>, Entry>,
    /// Keys moved to other logical databases with `MOVE`.
    moved: HashMap<i64, BTreeMap<Vec<u8>, Entry>>,
    expiry_ms: HashMap<Vec<u8>, i64>,
    config: HashMap<Vec<u8>, Vec<u8>>,
    published: Vec<(Vec<u8>, Vec<u8>)>,
    commands: Vec<String>,
    connects: usize,
    quits: usize,
    saves: usize,
    down: bool,
}

/// A shared in-memory server. Clones talk to the same data.
#[derive(Clone, Default)]
pub(crate) struct MemoryServer {
    name: String,
    db: Arc<Mutex<Db>>,
}

impl MemoryServer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            db: Arc::default(),
        }
    }

    pub fn open(&self) -> MemoryConnection {
        MemoryConnection {
            server: self.clone(),
            open: true,
            queued: None,
        }
    }

    pub fn set_down(&self, down: bool) {
        self.db.lock().down = down;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.db.lock().data.contains_key(key.as_bytes())
    }

    pub fn key_count(&self) -> usize {
        self.db.lock().data.len()
    }

    pub fn string_value(&self, key: &str) -> Option<String> {
        match self.db.lock().data.get(key.as_bytes()) {
            Some(Entry::Str(v)) => Some(String::from_utf8_lossy(v).into_owned()),
            _ => None,
        }
    }

    pub fn expiry_ms(&self, key: &str) -> Option<i64> {
        self.db.lock().expiry_ms.get(key.as_bytes()).copied()
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.db
            .lock()
            .published
            .iter()
            .map(|(c, m)| (String::from_utf8_lossy(c).into_owned(), String::from_utf8_lossy(m).into_owned()))
            .collect()
    }

    /// Command names received so far, upper-cased.
    pub fn commands(&self) -> Vec<String> {
        self.db.lock().commands.clone()
    }

    pub fn connects(&self) -> usize {
        self.db.lock().connects
    }

    /// Whether `key` was moved into database `index`.
    pub fn contains_in(&self, index: i64, key: &str) -> bool {
        self.db
            .lock()
            .moved
            .get(&index)
            .map_or(false, |data| data.contains_key(key.as_bytes()))
    }

    pub fn quits(&self) -> usize {
        self.db.lock().quits
    }

    pub fn saves(&self) -> usize {
        self.db.lock().saves
    }
}

impl Connector for MemoryServer {
    type Connection = MemoryConnection;

    fn connect(&self) -> RedisResult<MemoryConnection> {
        let mut db = self.db.lock();
        if db.down {
            return Err(RedisError::from((ErrorKind::IoError, "connection refused")));
        }
        db.connects += 1;
        drop(db);
        Ok(self.open())
    }

    fn describe(&self) -> String {
        format!("memory://{}", self.name)
    }
}

impl r2d2::ManageConnection for MemoryServer {
    type Connection = MemoryConnection;
    type Error = RedisError;

    fn connect(&self) -> Result<MemoryConnection, RedisError> {
        Connector::connect(self)
    }

    fn is_valid(&self, conn: &mut MemoryConnection) -> Result<(), RedisError> {
        redis::cmd("PING").query::<String>(conn).map(|_| ())
    }

    fn has_broken(&self, conn: &mut MemoryConnection) -> bool {
        !conn.open
    }
}

/// Unnamed shard infos placed like `SHARD-{i}-NODE-{n}`.
pub(crate) fn memory_shards(count: usize) -> Vec<ShardInfo> {
    (0..count).map(|i| ShardInfo::new(format!("memory://shard{}", i))).collect()
}

pub(crate) fn memory_single() -> (MemoryServer, RedisAdaptor<MemoryConnection>) {
    let server = MemoryServer::new("single");
    let adaptor = RedisAdaptor::single(server.open());
    (server, adaptor)
}

pub(crate) fn memory_cluster(count: usize) -> (Vec<MemoryServer>, RedisAdaptor<MemoryConnection>) {
    let infos = memory_shards(count);
    let servers: Vec<MemoryServer> = (0..count).map(|i| MemoryServer::new(&format!("shard{}", i))).collect();
    let ring = Arc::new(ShardRing::new(&infos, Hashing::Murmur, None).expect("ring"));
    let conns = infos.into_iter().zip(servers.iter().map(MemoryServer::open)).collect();
    let sharded = ShardedConnection::new(conns, ring).expect("sharded connection");
    (servers, RedisAdaptor::sharded(sharded))
}

pub(crate) struct MemoryConnection {
    server: MemoryServer,
    open: bool,
    queued: Option<Vec<Args>>,
}

impl ConnectionLike for MemoryConnection {
    fn req_packed_command(&mut self, cmd: &[u8]) -> RedisResult<Value> {
        let mut commands = parse_commands(cmd)?;
        if commands.len() != 1 {
            return Err(RedisError::from((ErrorKind::ClientError, "expected exactly one command")));
        }
        self.dispatch(commands.remove(0))
    }

    fn req_packed_commands(&mut self, cmd: &[u8], offset: usize, count: usize) -> RedisResult<Vec<Value>> {
        let mut replies = Vec::new();
        for args in parse_commands(cmd)? {
            replies.push(self.dispatch(args)?);
        }
        Ok(replies.into_iter().skip(offset).take(count).collect())
    }

    fn get_db(&self) -> i64 {
        0
    }

    fn check_connection(&mut self) -> bool {
        self.open && !self.server.db.lock().down
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl MemoryConnection {
    fn dispatch(&mut self, args: Args) -> RedisResult<Value> {
        if !self.open {
            return Err(RedisError::from((ErrorKind::IoError, "connection closed")));
        }
        let name = upper(&args[0]);
        match name.as_str() {
            "MULTI" => {
                self.queued = Some(Vec::new());
                return Ok(Value::Okay);
            }
            "DISCARD" => {
                self.queued = None;
                return Ok(Value::Okay);
            }
            "EXEC" => {
                let queued = self.queued.take().unwrap_or_default();
                let mut replies = Vec::with_capacity(queued.len());
                for args in queued {
                    replies.push(self.run(args)?);
                }
                return Ok(Value::Array(replies));
            }
            "QUIT" => {
                self.open = false;
                self.server.db.lock().quits += 1;
                return Ok(Value::Okay);
            }
            _ => {}
        }
        if let Some(queue) = self.queued.as_mut() {
            queue.push(args);
            return Ok(Value::SimpleString("QUEUED".to_string()));
        }
        self.run(args)
    }

    fn run(&mut self, args: Args) -> RedisResult<Value> {
        let mut db = self.server.db.lock();
        if db.down {
            return Err(RedisError::from((ErrorKind::IoError, "server unreachable")));
        }
        let name = upper(&args[0]);
        db.commands.push(name.clone());
        execute(&mut db, &name, &args[1..])
    }
}

fn upper(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_ascii_uppercase()
}

fn parse_commands(mut buf: &[u8]) -> RedisResult<Vec<Args>> {
    let mut commands = Vec::new();
    while !buf.is_empty() {
        let (count, rest) = read_header(buf, b'*')?;
        buf = rest;
        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            let (len, rest) = read_header(buf, b'$')?;
            if rest.len() < len + 2 {
                return Err(protocol_error());
            }
            args.push(rest[..len].to_vec());
            buf = &rest[len + 2..];
        }
        commands.push(args);
    }
    Ok(commands)
}

fn read_header(buf: &[u8], marker: u8) -> RedisResult<(usize, &[u8])> {
    if buf.first() != Some(&marker) {
        return Err(protocol_error());
    }
    let end = buf.windows(2).position(|w| w == b"\r\n").ok_or_else(protocol_error)?;
    let n = std::str::from_utf8(&buf[1..end])
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(protocol_error)?;
    Ok((n, &buf[end + 2..]))
}

fn protocol_error() -> RedisError {
    RedisError::from((ErrorKind::ClientError, "malformed packed command"))
}

fn err(msg: &'static str) -> RedisError {
    RedisError::from((ErrorKind::ResponseError, msg))
}

fn wrong_type() -> RedisError {
    RedisError::from((ErrorKind::TypeError, "WRONGTYPE Operation against a key holding the wrong kind of value"))
}

fn arity(args: &[Vec<u8>], min: usize) -> RedisResult<()> {
    if args.len() < min {
        Err(err("ERR wrong number of arguments"))
    } else {
        Ok(())
    }
}

fn int_arg(arg: &[u8]) -> RedisResult<i64> {
    std::str::from_utf8(arg)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| err("ERR value is not an integer or out of range"))
}

fn float_arg(arg: &[u8]) -> RedisResult<f64> {
    std::str::from_utf8(arg)
        .ok()
        .and_then(|s| match s {
            "+inf" | "inf" => Some(f64::INFINITY),
            "-inf" => Some(f64::NEG_INFINITY),
            other => other.parse().ok(),
        })
        .ok_or_else(|| err("ERR value is not a valid float"))
}

/// Score bound such as `1.5`, `(1.5`, `-inf`. Returns (value, exclusive).
fn bound_arg(arg: &[u8]) -> RedisResult<(f64, bool)> {
    match arg.first() {
        Some(b'(') => Ok((float_arg(&arg[1..])?, true)),
        _ => Ok((float_arg(arg)?, false)),
    }
}

fn above(score: f64, bound: (f64, bool)) -> bool {
    if bound.1 { score > bound.0 } else { score >= bound.0 }
}

fn below(score: f64, bound: (f64, bool)) -> bool {
    if bound.1 { score < bound.0 } else { score <= bound.0 }
}

fn bulk(bytes: &[u8]) -> Value {
    Value::BulkString(bytes.to_vec())
}

fn bulk_array<'a>(items: impl IntoIterator<Item = &'a Vec<u8>>) -> Value {
    Value::Array(items.into_iter().map(|item| bulk(item)).collect())
}

fn format_score(score: f64) -> Vec<u8> {
    score.to_string().into_bytes()
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Resolves `start..=stop` with negative indices against `len`.
fn range_indices(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len || stop < 0 {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    match (pattern.first(), text.first()) {
        (None, None) => true,
        (Some(b'*'), _) => {
            glob_match(&pattern[1..], text) || (!text.is_empty() && glob_match(pattern, &text[1..]))
        }
        (Some(b'?'), Some(_)) => glob_match(&pattern[1..], &text[1..]),
        (Some(p), Some(t)) if p == t => glob_match(&pattern[1..], &text[1..]),
        _ => false,
    }
}

/// Resolves a `SORT` pattern such as `weight_*` or `user_*->age` for `item`.
fn lookup_pattern(db: &Db, pattern: &[u8], item: &[u8]) -> Option<Vec<u8>> {
    let star = pattern.iter().position(|b| *b == b'*')?;
    let (key_pattern, field) = match pattern.windows(2).rposition(|w| w == b"->") {
        Some(pos) if pos > star => (&pattern[..pos], Some(&pattern[pos + 2..])),
        _ => (pattern, None),
    };
    let mut key = key_pattern[..star].to_vec();
    key.extend_from_slice(item);
    key.extend_from_slice(&key_pattern[star + 1..]);
    match (db.data.get(&key)?, field) {
        (Entry::Str(v), None) => Some(v.clone()),
        (Entry::Hash(h), Some(field)) => h.get(field).cloned(),
        _ => None,
    }
}

macro_rules! typed {
    ($db:expr, $key:expr, $variant:ident, $default:expr) => {{
        let entry = $db
            .data
            .entry($key.to_vec())
            .or_insert_with(|| Entry::$variant($default));
        match entry {
            Entry::$variant(inner) => inner,
            _ => return Err(wrong_type()),
        }
    }};
}

macro_rules! peek {
    ($db:expr, $key:expr, $variant:ident) => {{
        match $db.data.get($key) {
            Some(Entry::$variant(inner)) => Some(inner),
            Some(_) => return Err(wrong_type()),
            None => None,
        }
    }};
}

fn remove_if_empty(db: &mut Db, key: &[u8]) {
    let empty = match db.data.get(key) {
        Some(Entry::List(l)) => l.is_empty(),
        Some(Entry::Set(s)) => s.is_empty(),
        Some(Entry::Hash(h)) => h.is_empty(),
        Some(Entry::ZSet(z)) => z.is_empty(),
        _ => false,
    };
    if empty {
        db.data.remove(key);
        db.expiry_ms.remove(key);
    }
}

fn remove_key(db: &mut Db, key: &[u8]) -> bool {
    db.expiry_ms.remove(key);
    db.data.remove(key).is_some()
}

fn set_members(db: &Db, keys: &[Vec<u8>]) -> RedisResult<Vec<BTreeSet<Vec<u8>>>> {
    let mut sets = Vec::with_capacity(keys.len());
    for key in keys {
        sets.push(peek!(db, key, Set).cloned().unwrap_or_default());
    }
    Ok(sets)
}

fn set_algebra(op: &str, sets: Vec<BTreeSet<Vec<u8>>>) -> BTreeSet<Vec<u8>> {
    let mut iter = sets.into_iter();
    let first = iter.next().unwrap_or_default();
    iter.fold(first, |acc, next| match op {
        "INTER" => acc.intersection(&next).cloned().collect(),
        "UNION" => acc.union(&next).cloned().collect(),
        _ => acc.difference(&next).cloned().collect(),
    })
}

fn sort_zset(z: &mut [(Vec<u8>, f64)]) {
    z.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
}

fn zset_reply(items: Vec<(Vec<u8>, f64)>, with_scores: bool) -> Value {
    let mut out = Vec::new();
    for (member, score) in items {
        out.push(Value::BulkString(member));
        if with_scores {
            out.push(Value::BulkString(format_score(score)));
        }
    }
    Value::Array(out)
}

fn execute(db: &mut Db, name: &str, args: &[Vec<u8>]) -> RedisResult<Value> {
    match name {
        "PING" => Ok(Value::SimpleString("PONG".to_string())),
        "ECHO" => {
            arity(args, 1)?;
            Ok(bulk(&args[0]))
        }
        "SELECT" | "WATCH" | "UNWATCH" => Ok(Value::Okay),
        "INFO" => Ok(Value::BulkString(b"# Server\r\nredis_version:7.2.0\r\n".to_vec())),
        "SAVE" => {
            db.saves += 1;
            Ok(Value::Okay)
        }
        "DBSIZE" => Ok(Value::Int(db.data.len() as i64)),
        "FLUSHDB" | "FLUSHALL" => {
            db.data.clear();
            db.expiry_ms.clear();
            if name == "FLUSHALL" {
                db.moved.clear();
            }
            Ok(Value::Okay)
        }
        "SLOWLOG" => {
            arity(args, 1)?;
            match upper(&args[0]).as_str() {
                "RESET" => Ok(Value::Okay),
                "LEN" => Ok(Value::Int(0)),
                "GET" => Ok(Value::Array(Vec::new())),
                _ => Err(err("ERR unknown SLOWLOG subcommand")),
            }
        }
        "CONFIG" => {
            arity(args, 1)?;
            match upper(&args[0]).as_str() {
                "GET" => {
                    arity(args, 2)?;
                    let mut out = Vec::new();
                    for (k, v) in &db.config {
                        if glob_match(&args[1], k) {
                            out.push(bulk(k));
                            out.push(bulk(v));
                        }
                    }
                    Ok(Value::Array(out))
                }
                "SET" => {
                    arity(args, 3)?;
                    db.config.insert(args[1].clone(), args[2].clone());
                    Ok(Value::Okay)
                }
                "RESETSTAT" => Ok(Value::Okay),
                _ => Err(err("ERR unknown CONFIG subcommand")),
            }
        }
        "PUBLISH" => {
            arity(args, 2)?;
            db.published.push((args[0].clone(), args[1].clone()));
            Ok(Value::Int(0))
        }

        // keys
        "DEL" => {
            let removed = args.iter().filter(|k| remove_key(db, k)).count();
            Ok(Value::Int(removed as i64))
        }
        "EXISTS" => Ok(Value::Int(args.iter().filter(|k| db.data.contains_key(*k)).count() as i64)),
        "TYPE" => {
            arity(args, 1)?;
            let name = db.data.get(&args[0]).map_or("none", Entry::type_name);
            Ok(Value::SimpleString(name.to_string()))
        }
        "KEYS" => {
            arity(args, 1)?;
            Ok(bulk_array(db.data.keys().filter(|k| glob_match(&args[0], k))))
        }
        "RANDOMKEY" => Ok(db.data.keys().next().map_or(Value::Nil, |k| bulk(k))),
        "RENAME" | "RENAMENX" => {
            arity(args, 2)?;
            if !db.data.contains_key(&args[0]) {
                return Err(err("ERR no such key"));
            }
            if name == "RENAMENX" && db.data.contains_key(&args[1]) {
                return Ok(Value::Int(0));
            }
            let entry = db.data.remove(&args[0]).ok_or_else(|| err("ERR no such key"))?;
            db.data.insert(args[1].clone(), entry);
            if let Some(ttl) = db.expiry_ms.remove(&args[0]) {
                db.expiry_ms.insert(args[1].clone(), ttl);
            }
            Ok(if name == "RENAME" { Value::Okay } else { Value::Int(1) })
        }
        "EXPIRE" | "PEXPIRE" | "EXPIREAT" => {
            arity(args, 2)?;
            if !db.data.contains_key(&args[0]) {
                return Ok(Value::Int(0));
            }
            let n = int_arg(&args[1])?;
            let ms = match name {
                "EXPIRE" => n * 1000,
                "PEXPIRE" => n,
                _ => n * 1000 - now_ms(),
            };
            db.expiry_ms.insert(args[0].clone(), ms);
            Ok(Value::Int(1))
        }
        "TTL" | "PTTL" => {
            arity(args, 1)?;
            if !db.data.contains_key(&args[0]) {
                return Ok(Value::Int(-2));
            }
            Ok(Value::Int(match db.expiry_ms.get(&args[0]) {
                Some(ms) if name == "TTL" => ms / 1000,
                Some(ms) => *ms,
                None => -1,
            }))
        }
        "PERSIST" => {
            arity(args, 1)?;
            Ok(Value::Int(db.expiry_ms.remove(&args[0]).is_some() as i64))
        }
        "SORT" => {
            arity(args, 1)?;
            let mut items: Vec<Vec<u8>> = match db.data.get(&args[0]) {
                Some(Entry::List(l)) => l.iter().cloned().collect(),
                Some(Entry::Set(s)) => s.iter().cloned().collect(),
                Some(_) => return Err(wrong_type()),
                None => Vec::new(),
            };
            let (mut by, mut gets, mut limit, mut store) = (None, Vec::new(), None, None);
            let (mut desc, mut alpha) = (false, false);
            let mut i = 1;
            while i < args.len() {
                match upper(&args[i]).as_str() {
                    "BY" | "GET" | "STORE" => {
                        arity(args, i + 2)?;
                        match upper(&args[i]).as_str() {
                            "BY" => by = Some(args[i + 1].clone()),
                            "GET" => gets.push(args[i + 1].clone()),
                            _ => store = Some(args[i + 1].clone()),
                        }
                        i += 2;
                    }
                    "LIMIT" => {
                        arity(args, i + 3)?;
                        limit = Some((int_arg(&args[i + 1])?, int_arg(&args[i + 2])?));
                        i += 3;
                    }
                    "ASC" => (desc, i) = (false, i + 1),
                    "DESC" => (desc, i) = (true, i + 1),
                    "ALPHA" => (alpha, i) = (true, i + 1),
                    _ => return Err(err("ERR syntax error")),
                }
            }

            let view: &Db = db;
            // a BY pattern without `*` (e.g. `nosort`) keeps the stored order
            if by.as_ref().map_or(true, |p| p.contains(&b'*')) {
                let weight = |item: &Vec<u8>| match &by {
                    Some(pattern) => lookup_pattern(view, pattern, item),
                    None => Some(item.clone()),
                };
                if alpha {
                    let mut keyed: Vec<(Option<Vec<u8>>, Vec<u8>)> =
                        items.into_iter().map(|item| (weight(&item), item)).collect();
                    keyed.sort_by(|a, b| a.0.cmp(&b.0));
                    items = keyed.into_iter().map(|(_, item)| item).collect();
                } else {
                    let mut keyed = Vec::with_capacity(items.len());
                    for item in items {
                        let score = match weight(&item) {
                            Some(w) => float_arg(&w)?,
                            None => 0.0,
                        };
                        keyed.push((score, item));
                    }
                    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
                    items = keyed.into_iter().map(|(_, item)| item).collect();
                }
                if desc {
                    items.reverse();
                }
            }
            if let Some((offset, count)) = limit {
                let count = if count < 0 { items.len() } else { count as usize };
                items = items.into_iter().skip(offset.max(0) as usize).take(count).collect();
            }

            let values: Vec<Option<Vec<u8>>> = if gets.is_empty() {
                items.into_iter().map(Some).collect()
            } else {
                items
                    .iter()
                    .flat_map(|item| {
                        gets.iter().map(move |pattern| match pattern.as_slice() {
                            b"#" => Some(item.clone()),
                            pattern => lookup_pattern(view, pattern, item),
                        })
                    })
                    .collect()
            };
            match store {
                Some(dst) => {
                    let len = values.len();
                    remove_key(db, &dst);
                    if len > 0 {
                        let list = values.into_iter().map(Option::unwrap_or_default).collect();
                        db.data.insert(dst, Entry::List(list));
                    }
                    Ok(Value::Int(len as i64))
                }
                None => Ok(Value::Array(values.into_iter().map(|v| v.map_or(Value::Nil, Value::BulkString)).collect())),
            }
        }
        "MOVE" => {
            arity(args, 2)?;
            let target = int_arg(&args[1])?;
            if target == 0 {
                return Err(err("ERR source and destination objects are the same"));
            }
            if db.moved.get(&target).map_or(false, |data| data.contains_key(&args[0])) {
                return Ok(Value::Int(0));
            }
            match db.data.remove(&args[0]) {
                Some(entry) => {
                    db.expiry_ms.remove(&args[0]);
                    db.moved.entry(target).or_default().insert(args[0].clone(), entry);
                    Ok(Value::Int(1))
                }
                None => Ok(Value::Int(0)),
            }
        }
        "OBJECT" => {
            arity(args, 2)?;
            let entry = db.data.get(&args[1]);
            match upper(&args[0]).as_str() {
                "REFCOUNT" => Ok(entry.map_or(Value::Nil, |_| Value::Int(1))),
                "IDLETIME" => Ok(entry.map_or(Value::Nil, |_| Value::Int(0))),
                "ENCODING" => Ok(entry.map_or(Value::Nil, |e| bulk(e.encoding().as_bytes()))),
                _ => Err(err("ERR unknown OBJECT subcommand")),
            }
        }

        // strings
        "SET" => {
            arity(args, 2)?;
            let opts: Vec<String> = args[2..].iter().map(|a| upper(a)).collect();
            if opts.iter().any(|o| o == "NX") && db.data.contains_key(&args[0]) {
                return Ok(Value::Nil);
            }
            db.data.insert(args[0].clone(), Entry::Str(args[1].clone()));
            db.expiry_ms.remove(&args[0]);
            if let Some(pos) = opts.iter().position(|o| o == "EX" || o == "PX") {
                let n = int_arg(&args[pos + 3])?;
                let ms = if opts[pos] == "EX" { n * 1000 } else { n };
                db.expiry_ms.insert(args[0].clone(), ms);
            }
            Ok(Value::Okay)
        }
        "SETEX" => {
            arity(args, 3)?;
            let secs = int_arg(&args[1])?;
            db.data.insert(args[0].clone(), Entry::Str(args[2].clone()));
            db.expiry_ms.insert(args[0].clone(), secs * 1000);
            Ok(Value::Okay)
        }
        "SETNX" => {
            arity(args, 2)?;
            if db.data.contains_key(&args[0]) {
                return Ok(Value::Int(0));
            }
            db.data.insert(args[0].clone(), Entry::Str(args[1].clone()));
            Ok(Value::Int(1))
        }
        "GET" => {
            arity(args, 1)?;
            Ok(peek!(db, &args[0], Str).map_or(Value::Nil, |v| bulk(v)))
        }
        "GETSET" => {
            arity(args, 2)?;
            let old = peek!(db, &args[0], Str).map_or(Value::Nil, |v| bulk(v));
            db.data.insert(args[0].clone(), Entry::Str(args[1].clone()));
            Ok(old)
        }
        "MGET" => {
            let mut out = Vec::with_capacity(args.len());
            for key in args {
                out.push(match db.data.get(key) {
                    Some(Entry::Str(v)) => bulk(v),
                    _ => Value::Nil,
                });
            }
            Ok(Value::Array(out))
        }
        "MSET" => {
            for pair in args.chunks(2) {
                if pair.len() == 2 {
                    db.data.insert(pair[0].clone(), Entry::Str(pair[1].clone()));
                }
            }
            Ok(Value::Okay)
        }
        "MSETNX" => {
            if args.chunks(2).any(|pair| db.data.contains_key(&pair[0])) {
                return Ok(Value::Int(0));
            }
            for pair in args.chunks(2) {
                if pair.len() == 2 {
                    db.data.insert(pair[0].clone(), Entry::Str(pair[1].clone()));
                }
            }
            Ok(Value::Int(1))
        }
        "INCR" | "DECR" | "INCRBY" | "DECRBY" => {
            arity(args, 1)?;
            let delta = match name {
                "INCR" => 1,
                "DECR" => -1,
                "INCRBY" => int_arg(args.get(1).ok_or_else(|| err("ERR wrong number of arguments"))?)?,
                _ => -int_arg(args.get(1).ok_or_else(|| err("ERR wrong number of arguments"))?)?,
            };
            let current = match peek!(db, &args[0], Str) {
                Some(v) => int_arg(v)?,
                None => 0,
            };
            let next = current + delta;
            db.data.insert(args[0].clone(), Entry::Str(next.to_string().into_bytes()));
            Ok(Value::Int(next))
        }
        "APPEND" => {
            arity(args, 2)?;
            let value = typed!(db, &args[0], Str, Vec::new());
            value.extend_from_slice(&args[1]);
            Ok(Value::Int(value.len() as i64))
        }
        "STRLEN" => {
            arity(args, 1)?;
            Ok(Value::Int(peek!(db, &args[0], Str).map_or(0, |v| v.len()) as i64))
        }
        "GETRANGE" | "SUBSTR" => {
            arity(args, 3)?;
            let value = peek!(db, &args[0], Str).cloned().unwrap_or_default();
            let out = match range_indices(value.len(), int_arg(&args[1])?, int_arg(&args[2])?) {
                Some((start, stop)) => value[start..=stop].to_vec(),
                None => Vec::new(),
            };
            Ok(Value::BulkString(out))
        }
        "SETRANGE" => {
            arity(args, 3)?;
            let offset = int_arg(&args[1])? as usize;
            let value = typed!(db, &args[0], Str, Vec::new());
            if value.len() < offset + args[2].len() {
                value.resize(offset + args[2].len(), 0);
            }
            value[offset..offset + args[2].len()].copy_from_slice(&args[2]);
            Ok(Value::Int(value.len() as i64))
        }
        "SETBIT" | "GETBIT" => {
            arity(args, 2)?;
            let offset = int_arg(&args[1])? as usize;
            let (byte, bit) = (offset / 8, 7 - (offset % 8));
            if name == "GETBIT" {
                let value = peek!(db, &args[0], Str).cloned().unwrap_or_default();
                return Ok(Value::Int(value.get(byte).map_or(0, |b| (b >> bit) & 1) as i64));
            }
            arity(args, 3)?;
            let on = int_arg(&args[2])? == 1;
            let value = typed!(db, &args[0], Str, Vec::new());
            if value.len() <= byte {
                value.resize(byte + 1, 0);
            }
            let old = (value[byte] >> bit) & 1;
            if on {
                value[byte] |= 1 << bit;
            } else {
                value[byte] &= !(1 << bit);
            }
            Ok(Value::Int(old as i64))
        }

        // hashes
        "HSET" | "HMSET" => {
            arity(args, 3)?;
            let hash = typed!(db, &args[0], Hash, BTreeMap::new());
            let mut added = 0;
            for pair in args[1..].chunks(2) {
                if pair.len() == 2 && hash.insert(pair[0].clone(), pair[1].clone()).is_none() {
                    added += 1;
                }
            }
            Ok(if name == "HMSET" { Value::Okay } else { Value::Int(added) })
        }
        "HSETNX" => {
            arity(args, 3)?;
            let hash = typed!(db, &args[0], Hash, BTreeMap::new());
            if hash.contains_key(&args[1]) {
                return Ok(Value::Int(0));
            }
            hash.insert(args[1].clone(), args[2].clone());
            Ok(Value::Int(1))
        }
        "HGET" => {
            arity(args, 2)?;
            Ok(peek!(db, &args[0], Hash).and_then(|h| h.get(&args[1])).map_or(Value::Nil, |v| bulk(v)))
        }
        "HMGET" => {
            arity(args, 2)?;
            let hash = peek!(db, &args[0], Hash).cloned().unwrap_or_default();
            Ok(Value::Array(args[1..].iter().map(|f| hash.get(f).map_or(Value::Nil, |v| bulk(v))).collect()))
        }
        "HINCRBY" => {
            arity(args, 3)?;
            let delta = int_arg(&args[2])?;
            let hash = typed!(db, &args[0], Hash, BTreeMap::new());
            let current = match hash.get(&args[1]) {
                Some(v) => int_arg(v)?,
                None => 0,
            };
            hash.insert(args[1].clone(), (current + delta).to_string().into_bytes());
            Ok(Value::Int(current + delta))
        }
        "HEXISTS" => {
            arity(args, 2)?;
            Ok(Value::Int(peek!(db, &args[0], Hash).map_or(false, |h| h.contains_key(&args[1])) as i64))
        }
        "HDEL" => {
            arity(args, 2)?;
            let removed = match db.data.get_mut(&args[0]) {
                Some(Entry::Hash(h)) => args[1..].iter().filter(|f| h.remove(*f).is_some()).count(),
                Some(_) => return Err(wrong_type()),
                None => 0,
            };
            remove_if_empty(db, &args[0]);
            Ok(Value::Int(removed as i64))
        }
        "HLEN" => {
            arity(args, 1)?;
            Ok(Value::Int(peek!(db, &args[0], Hash).map_or(0, |h| h.len()) as i64))
        }
        "HKEYS" | "HVALS" | "HGETALL" => {
            arity(args, 1)?;
            let hash = peek!(db, &args[0], Hash).cloned().unwrap_or_default();
            Ok(match name {
                "HKEYS" => bulk_array(hash.keys()),
                "HVALS" => bulk_array(hash.values()),
                _ => Value::Array(hash.iter().flat_map(|(k, v)| [bulk(k), bulk(v)]).collect()),
            })
        }

        // lists
        "LPUSH" | "RPUSH" | "LPUSHX" | "RPUSHX" => {
            arity(args, 2)?;
            if name.ends_with('X') && !db.data.contains_key(&args[0]) {
                return Ok(Value::Int(0));
            }
            let list = typed!(db, &args[0], List, VecDeque::new());
            for value in &args[1..] {
                if name.starts_with('L') {
                    list.push_front(value.clone());
                } else {
                    list.push_back(value.clone());
                }
            }
            Ok(Value::Int(list.len() as i64))
        }
        "LLEN" => {
            arity(args, 1)?;
            Ok(Value::Int(peek!(db, &args[0], List).map_or(0, |l| l.len()) as i64))
        }
        "LRANGE" => {
            arity(args, 3)?;
            let list = peek!(db, &args[0], List).cloned().unwrap_or_default();
            Ok(match range_indices(list.len(), int_arg(&args[1])?, int_arg(&args[2])?) {
                Some((start, stop)) => bulk_array(list.range(start..=stop)),
                None => Value::Array(Vec::new()),
            })
        }
        "LTRIM" => {
            arity(args, 3)?;
            let (start, stop) = (int_arg(&args[1])?, int_arg(&args[2])?);
            if let Some(Entry::List(list)) = db.data.get_mut(&args[0]) {
                *list = match range_indices(list.len(), start, stop) {
                    Some((s, e)) => list.range(s..=e).cloned().collect(),
                    None => VecDeque::new(),
                };
            }
            remove_if_empty(db, &args[0]);
            Ok(Value::Okay)
        }
        "LINDEX" => {
            arity(args, 2)?;
            let list = peek!(db, &args[0], List).cloned().unwrap_or_default();
            let index = int_arg(&args[1])?;
            let index = if index < 0 { list.len() as i64 + index } else { index };
            Ok(usize::try_from(index).ok().and_then(|i| list.get(i)).map_or(Value::Nil, |v| bulk(v)))
        }
        "LSET" => {
            arity(args, 3)?;
            let index = int_arg(&args[1])?;
            match db.data.get_mut(&args[0]) {
                Some(Entry::List(list)) => {
                    let index = if index < 0 { list.len() as i64 + index } else { index };
                    match usize::try_from(index).ok().and_then(|i| list.get_mut(i)) {
                        Some(slot) => {
                            *slot = args[2].clone();
                            Ok(Value::Okay)
                        }
                        None => Err(err("ERR index out of range")),
                    }
                }
                Some(_) => Err(wrong_type()),
                None => Err(err("ERR no such key")),
            }
        }
        "LREM" => {
            arity(args, 3)?;
            let count = int_arg(&args[1])?;
            let removed = match db.data.get_mut(&args[0]) {
                Some(Entry::List(list)) => {
                    let limit = if count == 0 { usize::MAX } else { count.unsigned_abs() as usize };
                    let mut removed = 0;
                    let mut items: Vec<Vec<u8>> = list.drain(..).collect();
                    if count < 0 {
                        items.reverse();
                    }
                    items.retain(|item| {
                        if removed < limit && item == &args[2] {
                            removed += 1;
                            false
                        } else {
                            true
                        }
                    });
                    if count < 0 {
                        items.reverse();
                    }
                    list.extend(items);
                    removed
                }
                Some(_) => return Err(wrong_type()),
                None => 0,
            };
            remove_if_empty(db, &args[0]);
            Ok(Value::Int(removed as i64))
        }
        "LPOP" | "RPOP" => {
            arity(args, 1)?;
            let popped = match db.data.get_mut(&args[0]) {
                Some(Entry::List(list)) => {
                    if name == "LPOP" { list.pop_front() } else { list.pop_back() }
                }
                Some(_) => return Err(wrong_type()),
                None => None,
            };
            remove_if_empty(db, &args[0]);
            Ok(popped.map_or(Value::Nil, Value::BulkString))
        }
        "BLPOP" | "BRPOP" => {
            arity(args, 2)?;
            let keys = &args[..args.len() - 1];
            for key in keys {
                let popped = match db.data.get_mut(key) {
                    Some(Entry::List(list)) => {
                        if name == "BLPOP" { list.pop_front() } else { list.pop_back() }
                    }
                    _ => None,
                };
                if let Some(value) = popped {
                    remove_if_empty(db, key);
                    return Ok(Value::Array(vec![bulk(key), Value::BulkString(value)]));
                }
            }
            Ok(Value::Nil)
        }
        "RPOPLPUSH" | "BRPOPLPUSH" => {
            arity(args, 2)?;
            let popped = match db.data.get_mut(&args[0]) {
                Some(Entry::List(list)) => list.pop_back(),
                Some(_) => return Err(wrong_type()),
                None => None,
            };
            remove_if_empty(db, &args[0]);
            match popped {
                Some(value) => {
                    typed!(db, &args[1], List, VecDeque::new()).push_front(value.clone());
                    Ok(Value::BulkString(value))
                }
                None => Ok(Value::Nil),
            }
        }
        "LINSERT" => {
            arity(args, 4)?;
            let before = upper(&args[1]) == "BEFORE";
            match db.data.get_mut(&args[0]) {
                Some(Entry::List(list)) => match list.iter().position(|item| item == &args[2]) {
                    Some(pos) => {
                        list.insert(if before { pos } else { pos + 1 }, args[3].clone());
                        Ok(Value::Int(list.len() as i64))
                    }
                    None => Ok(Value::Int(-1)),
                },
                Some(_) => Err(wrong_type()),
                None => Ok(Value::Int(0)),
            }
        }

        // sets
        "SADD" => {
            arity(args, 2)?;
            let set = typed!(db, &args[0], Set, BTreeSet::new());
            Ok(Value::Int(args[1..].iter().filter(|m| set.insert((*m).clone())).count() as i64))
        }
        "SREM" => {
            arity(args, 2)?;
            let removed = match db.data.get_mut(&args[0]) {
                Some(Entry::Set(set)) => args[1..].iter().filter(|m| set.remove(*m)).count(),
                Some(_) => return Err(wrong_type()),
                None => 0,
            };
            remove_if_empty(db, &args[0]);
            Ok(Value::Int(removed as i64))
        }
        "SMEMBERS" => {
            arity(args, 1)?;
            Ok(bulk_array(peek!(db, &args[0], Set).cloned().unwrap_or_default().iter()))
        }
        "SCARD" => {
            arity(args, 1)?;
            Ok(Value::Int(peek!(db, &args[0], Set).map_or(0, |s| s.len()) as i64))
        }
        "SISMEMBER" => {
            arity(args, 2)?;
            Ok(Value::Int(peek!(db, &args[0], Set).map_or(false, |s| s.contains(&args[1])) as i64))
        }
        "SRANDMEMBER" => {
            arity(args, 1)?;
            Ok(peek!(db, &args[0], Set).and_then(|s| s.iter().next()).map_or(Value::Nil, |m| bulk(m)))
        }
        "SPOP" => {
            arity(args, 1)?;
            let popped = match db.data.get_mut(&args[0]) {
                Some(Entry::Set(set)) => set.pop_first(),
                Some(_) => return Err(wrong_type()),
                None => None,
            };
            remove_if_empty(db, &args[0]);
            Ok(popped.map_or(Value::Nil, Value::BulkString))
        }
        "SMOVE" => {
            arity(args, 3)?;
            let moved = match db.data.get_mut(&args[0]) {
                Some(Entry::Set(set)) => set.remove(&args[2]),
                Some(_) => return Err(wrong_type()),
                None => false,
            };
            remove_if_empty(db, &args[0]);
            if moved {
                typed!(db, &args[1], Set, BTreeSet::new()).insert(args[2].clone());
            }
            Ok(Value::Int(moved as i64))
        }
        "SINTER" | "SUNION" | "SDIFF" => {
            arity(args, 1)?;
            let sets = set_members(db, args)?;
            Ok(bulk_array(set_algebra(&name[1..], sets).iter()))
        }
        "SINTERSTORE" | "SUNIONSTORE" | "SDIFFSTORE" => {
            arity(args, 2)?;
            let sets = set_members(db, &args[1..])?;
            let result = set_algebra(&name[1..name.len() - 5], sets);
            let len = result.len();
            remove_key(db, &args[0]);
            if len > 0 {
                db.data.insert(args[0].clone(), Entry::Set(result));
            }
            Ok(Value::Int(len as i64))
        }

        // sorted sets
        "ZADD" => {
            arity(args, 3)?;
            let mut pairs = Vec::new();
            for pair in args[1..].chunks(2) {
                if pair.len() == 2 {
                    pairs.push((float_arg(&pair[0])?, pair[1].clone()));
                }
            }
            let z = typed!(db, &args[0], ZSet, Vec::new());
            let mut added = 0;
            for (score, member) in pairs {
                match z.iter_mut().find(|(m, _)| *m == member) {
                    Some(existing) => existing.1 = score,
                    None => {
                        z.push((member, score));
                        added += 1;
                    }
                }
            }
            sort_zset(z);
            Ok(Value::Int(added))
        }
        "ZINCRBY" => {
            arity(args, 3)?;
            let delta = float_arg(&args[1])?;
            let z = typed!(db, &args[0], ZSet, Vec::new());
            let score = match z.iter_mut().find(|(m, _)| *m == args[2]) {
                Some(existing) => {
                    existing.1 += delta;
                    existing.1
                }
                None => {
                    z.push((args[2].clone(), delta));
                    delta
                }
            };
            sort_zset(z);
            Ok(Value::BulkString(format_score(score)))
        }
        "ZREM" => {
            arity(args, 2)?;
            let removed = match db.data.get_mut(&args[0]) {
                Some(Entry::ZSet(z)) => {
                    let before = z.len();
                    z.retain(|(m, _)| !args[1..].contains(m));
                    before - z.len()
                }
                Some(_) => return Err(wrong_type()),
                None => 0,
            };
            remove_if_empty(db, &args[0]);
            Ok(Value::Int(removed as i64))
        }
        "ZCARD" => {
            arity(args, 1)?;
            Ok(Value::Int(peek!(db, &args[0], ZSet).map_or(0, |z| z.len()) as i64))
        }
        "ZSCORE" => {
            arity(args, 2)?;
            Ok(peek!(db, &args[0], ZSet)
                .and_then(|z| z.iter().find(|(m, _)| *m == args[1]))
                .map_or(Value::Nil, |(_, s)| Value::BulkString(format_score(*s))))
        }
        "ZRANK" | "ZREVRANK" => {
            arity(args, 2)?;
            let z = peek!(db, &args[0], ZSet).cloned().unwrap_or_default();
            Ok(match z.iter().position(|(m, _)| *m == args[1]) {
                Some(pos) if name == "ZRANK" => Value::Int(pos as i64),
                Some(pos) => Value::Int((z.len() - 1 - pos) as i64),
                None => Value::Nil,
            })
        }
        "ZRANGE" | "ZREVRANGE" => {
            arity(args, 3)?;
            let mut z = peek!(db, &args[0], ZSet).cloned().unwrap_or_default();
            if name == "ZREVRANGE" {
                z.reverse();
            }
            let with_scores = args.len() > 3 && upper(&args[3]) == "WITHSCORES";
            let items = match range_indices(z.len(), int_arg(&args[1])?, int_arg(&args[2])?) {
                Some((start, stop)) => z[start..=stop].to_vec(),
                None => Vec::new(),
            };
            Ok(zset_reply(items, with_scores))
        }
        "ZCOUNT" | "ZRANGEBYSCORE" | "ZREVRANGEBYSCORE" | "ZREMRANGEBYSCORE" => {
            arity(args, 3)?;
            let (min, max) = if name == "ZREVRANGEBYSCORE" {
                (bound_arg(&args[2])?, bound_arg(&args[1])?)
            } else {
                (bound_arg(&args[1])?, bound_arg(&args[2])?)
            };
            let z = peek!(db, &args[0], ZSet).cloned().unwrap_or_default();
            let mut items: Vec<(Vec<u8>, f64)> =
                z.into_iter().filter(|(_, s)| above(*s, min) && below(*s, max)).collect();
            match name {
                "ZCOUNT" => return Ok(Value::Int(items.len() as i64)),
                "ZREMRANGEBYSCORE" => {
                    if let Some(Entry::ZSet(z)) = db.data.get_mut(&args[0]) {
                        z.retain(|entry| !items.contains(entry));
                    }
                    remove_if_empty(db, &args[0]);
                    return Ok(Value::Int(items.len() as i64));
                }
                "ZREVRANGEBYSCORE" => items.reverse(),
                _ => {}
            }
            let opts: Vec<String> = args[3..].iter().map(|a| upper(a)).collect();
            if let Some(pos) = opts.iter().position(|o| o == "LIMIT") {
                let offset = int_arg(&args[pos + 4])? as usize;
                let count = int_arg(&args[pos + 5])? as usize;
                items = items.into_iter().skip(offset).take(count).collect();
            }
            Ok(zset_reply(items, opts.iter().any(|o| o == "WITHSCORES")))
        }
        "ZREMRANGEBYRANK" => {
            arity(args, 3)?;
            let (start, stop) = (int_arg(&args[1])?, int_arg(&args[2])?);
            let removed = match db.data.get_mut(&args[0]) {
                Some(Entry::ZSet(z)) => match range_indices(z.len(), start, stop) {
                    Some((s, e)) => z.drain(s..=e).count(),
                    None => 0,
                },
                Some(_) => return Err(wrong_type()),
                None => 0,
            };
            remove_if_empty(db, &args[0]);
            Ok(Value::Int(removed as i64))
        }
        "ZUNIONSTORE" | "ZINTERSTORE" => {
            arity(args, 3)?;
            let count = int_arg(&args[1])?.max(0) as usize;
            arity(args, 2 + count)?;
            let mut weights = vec![1.0; count];
            let mut aggregate = "SUM".to_string();
            let mut i = 2 + count;
            while i < args.len() {
                match upper(&args[i]).as_str() {
                    "WEIGHTS" => {
                        arity(args, i + 1 + count)?;
                        for (n, weight) in args[i + 1..=i + count].iter().enumerate() {
                            weights[n] = float_arg(weight)?;
                        }
                        i += 1 + count;
                    }
                    "AGGREGATE" => {
                        arity(args, i + 2)?;
                        aggregate = upper(&args[i + 1]);
                        if !matches!(aggregate.as_str(), "SUM" | "MIN" | "MAX") {
                            return Err(err("ERR syntax error"));
                        }
                        i += 2;
                    }
                    _ => return Err(err("ERR syntax error")),
                }
            }

            // member -> (aggregated score, number of sources holding it)
            let mut combined: BTreeMap<Vec<u8>, (f64, usize)> = BTreeMap::new();
            for (key, weight) in args[2..2 + count].iter().zip(&weights) {
                let members: Vec<(Vec<u8>, f64)> = match db.data.get(key) {
                    Some(Entry::ZSet(z)) => z.clone(),
                    Some(Entry::Set(s)) => s.iter().map(|m| (m.clone(), 1.0)).collect(),
                    Some(_) => return Err(wrong_type()),
                    None => Vec::new(),
                };
                for (member, score) in members {
                    let score = score * weight;
                    combined
                        .entry(member)
                        .and_modify(|(acc, seen)| {
                            *acc = match aggregate.as_str() {
                                "MIN" => acc.min(score),
                                "MAX" => acc.max(score),
                                _ => *acc + score,
                            };
                            *seen += 1;
                        })
                        .or_insert((score, 1));
                }
            }
            let mut z: Vec<(Vec<u8>, f64)> = combined
                .into_iter()
                .filter(|(_, (_, seen))| name == "ZUNIONSTORE" || *seen == count)
                .map(|(member, (score, _))| (member, score))
                .collect();
            sort_zset(&mut z);
            let len = z.len();
            remove_key(db, &args[0]);
            if len > 0 {
                db.data.insert(args[0].clone(), Entry::ZSet(z));
            }
            Ok(Value::Int(len as i64))
        }

        _ => Err(RedisError::from((
            ErrorKind::ResponseError,
            "ERR unknown command",
            name.to_string(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_pipelines() {
        let mut conn = MemoryServer::new("parse").open();
        let replies: (String, i64, Vec<String>) = redis::pipe()
            .cmd("SET").arg("k").arg("v").ignore()
            .cmd("GET").arg("k")
            .cmd("RPUSH").arg("l").arg("a").arg("b")
            .cmd("LRANGE").arg("l").arg(0).arg(-1)
            .query(&mut conn)
            .unwrap();
        assert_eq!(replies, ("v".to_string(), 2, vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_glob() {
        assert!(glob_match(b"user:*", b"user:1"));
        assert!(glob_match(b"*", b""));
        assert!(glob_match(b"u?er", b"user"));
        assert!(!glob_match(b"user:?", b"user:10"));
    }
}
