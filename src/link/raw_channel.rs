use std::io;
use std::mem;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use libc::{
    c_int, c_void, sockaddr, sockaddr_ll, socklen_t, AF_PACKET, SOCK_CLOEXEC, SOCK_NONBLOCK,
    SOCK_RAW,
};
use tokio::io::unix::AsyncFd;
use tokio::io::Interest;

use crate::link::{FrameChannel, Interface};

/// `AF_PACKET` socket bound to one interface and one EtherType.
///
/// The kernel filters out every frame of a different EtherType before it reaches user space.
pub struct RawChannel {
    fd: AsyncFd<OwnedFd>,
}

impl RawChannel {
    pub fn open(interface: &Interface, ethertype: u16) -> io::Result<Self> {
        // man 7 packet: the protocol is given in network byte order
        let protocol = ethertype.to_be();

        let fd = unsafe {
            match libc::socket(
                AF_PACKET,
                SOCK_RAW | SOCK_NONBLOCK | SOCK_CLOEXEC,
                c_int::from(protocol),
            ) {
                -1 => return Err(io::Error::last_os_error()),
                fd => OwnedFd::from_raw_fd(fd),
            }
        };

        let mut sll: sockaddr_ll = unsafe { mem::zeroed() };
        sll.sll_family = AF_PACKET as u16;
        sll.sll_protocol = protocol;
        sll.sll_ifindex = c_int::try_from(interface.index)
            .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;

        let ret = unsafe {
            libc::bind(
                fd.as_raw_fd(),
                std::ptr::addr_of!(sll).cast::<sockaddr>(),
                mem::size_of::<sockaddr_ll>() as socklen_t,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self {
            fd: AsyncFd::with_interest(fd, Interest::READABLE | Interest::WRITABLE)?,
        })
    }
}

impl FrameChannel for RawChannel {
    async fn send(&self, frame: &[u8]) -> io::Result<usize> {
        loop {
            let mut guard = self.fd.writable().await?;
            let res = guard.try_io(|fd| {
                let ret = unsafe {
                    libc::send(
                        fd.get_ref().as_raw_fd(),
                        frame.as_ptr().cast::<c_void>(),
                        frame.len(),
                        0,
                    )
                };
                if ret < 0 {
                    Err(io::Error::last_os_error())
                } else {
                    Ok(ret as usize)
                }
            });
            if let Ok(res) = res {
                return res;
            }
        }
    }

    async fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let mut guard = self.fd.readable().await?;
            let res = guard.try_io(|fd| {
                let ret = unsafe {
                    libc::recv(
                        fd.get_ref().as_raw_fd(),
                        buf.as_mut_ptr().cast::<c_void>(),
                        buf.len(),
                        0,
                    )
                };
                if ret < 0 {
                    Err(io::Error::last_os_error())
                } else {
                    Ok(ret as usize)
                }
            });
            if let Ok(res) = res {
                return res;
            }
        }
    }
}
